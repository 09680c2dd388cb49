//! Self-help toolkit: exercise catalog, affirmations and personalized plans

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{
    BreathingExercise, CbtExercise, Exercise, ExerciseNames, MoodBand, SelfHelpPlan,
};

// =============================================================================
// CATALOG
// =============================================================================

pub const FOUR_SEVEN_EIGHT: BreathingExercise = BreathingExercise {
    name: "4-7-8 Breathing",
    instructions: "Inhale for 4 counts, hold for 7 counts, exhale for 8 counts. Repeat 4 times.",
    duration: 120,
    steps: &[
        "Find a comfortable position and close your eyes",
        "Place your tongue against the roof of your mouth behind your front teeth",
        "Exhale completely through your mouth",
        "Inhale through your nose for 4 counts",
        "Hold your breath for 7 counts",
        "Exhale through your mouth for 8 counts",
        "Repeat this cycle 3 more times",
    ],
};

pub const BOX_BREATHING: BreathingExercise = BreathingExercise {
    name: "Box Breathing",
    instructions: "Inhale for 4, hold for 4, exhale for 4, hold for 4. Repeat for 5 minutes.",
    duration: 300,
    steps: &[
        "Sit comfortably with your back straight",
        "Exhale all air from your lungs",
        "Inhale through your nose for 4 counts",
        "Hold your breath for 4 counts",
        "Exhale through your mouth for 4 counts",
        "Hold empty for 4 counts",
        "Repeat this pattern for 5 minutes",
    ],
};

pub const PROGRESSIVE_MUSCLE_RELAXATION: BreathingExercise = BreathingExercise {
    name: "Progressive Muscle Relaxation",
    instructions: "Tense and relax each muscle group, starting from your toes.",
    duration: 900,
    steps: &[
        "Lie down comfortably",
        "Start with your toes - tense for 5 seconds, then relax",
        "Move to your calves - tense and relax",
        "Continue with thighs, abdomen, hands, arms, shoulders",
        "Finish with your face muscles",
        "Breathe deeply throughout the exercise",
    ],
};

pub const THOUGHT_RECORD: CbtExercise = CbtExercise {
    name: "Thought Record",
    description: "Identify and challenge negative thoughts",
    steps: &[
        "What situation triggered this feeling?",
        "What thoughts went through your mind?",
        "What emotions did you feel (0-10 intensity)?",
        "What evidence supports this thought?",
        "What evidence contradicts this thought?",
        "What would you tell a friend in this situation?",
        "What's a more balanced way to think about this?",
    ],
};

pub const GRATITUDE_PRACTICE: CbtExercise = CbtExercise {
    name: "Gratitude Practice",
    description: "Focus on positive aspects of your life",
    steps: &[
        "List 3 things you're grateful for today",
        "Why are you grateful for each item?",
        "How did these things make you feel?",
        "What small thing today brought you joy?",
        "Who in your life are you thankful for and why?",
    ],
};

pub const PROBLEM_SOLVING: CbtExercise = CbtExercise {
    name: "Problem Solving",
    description: "Break down challenges into manageable steps",
    steps: &[
        "What specific problem are you facing?",
        "What are all possible solutions (brainstorm without judging)?",
        "What are the pros and cons of each solution?",
        "Which solution seems most realistic and helpful?",
        "What's the first small step you can take?",
        "When will you take this step?",
        "How will you know if it's working?",
    ],
};

pub const MINDFULNESS_CHECK_IN: CbtExercise = CbtExercise {
    name: "Mindfulness Check-in",
    description: "Ground yourself in the present moment",
    steps: &[
        "Name 5 things you can see around you",
        "Name 4 things you can touch",
        "Name 3 things you can hear",
        "Name 2 things you can smell",
        "Name 1 thing you can taste",
        "Take 3 deep breaths",
        "How do you feel right now?",
    ],
};

pub const BREATHING_EXERCISES: [BreathingExercise; 3] =
    [FOUR_SEVEN_EIGHT, BOX_BREATHING, PROGRESSIVE_MUSCLE_RELAXATION];

pub const CBT_EXERCISES: [CbtExercise; 4] = [
    THOUGHT_RECORD,
    GRATITUDE_PRACTICE,
    PROBLEM_SOLVING,
    MINDFULNESS_CHECK_IN,
];

pub const AFFIRMATIONS: [&str; 15] = [
    "I am worthy of love and respect.",
    "I have the strength to overcome any challenge.",
    "I choose peace and calm in this moment.",
    "I am grateful for all the good things in my life.",
    "I trust in my ability to make good decisions.",
    "I am becoming the best version of myself.",
    "I deserve happiness and joy.",
    "I am resilient and can handle whatever comes my way.",
    "I choose to focus on what I can control.",
    "I am enough, just as I am.",
    "I forgive myself for past mistakes and learn from them.",
    "I attract positive energy and opportunities.",
    "I am capable of creating positive change in my life.",
    "I choose to see the good in every situation.",
    "I am surrounded by love and support.",
];

/// Emotions that steer a medium-mood plan toward gratitude
const GRATITUDE_EMOTIONS: [&str; 3] = ["sadness", "fear", "pessimism"];

// =============================================================================
// TOOLKIT
// =============================================================================

/// Self-help toolkit over the static catalog
#[derive(Debug, Default)]
pub struct SelfHelpToolkit;

impl SelfHelpToolkit {
    /// Create new toolkit
    pub fn new() -> Self {
        Self
    }

    /// Breathing exercise by case-insensitive name, or a random one
    pub fn breathing_exercise<R: Rng + ?Sized>(
        &self,
        name: Option<&str>,
        rng: &mut R,
    ) -> BreathingExercise {
        if let Some(found) = name.and_then(|n| {
            BREATHING_EXERCISES
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case(n))
        }) {
            return *found;
        }
        *BREATHING_EXERCISES.choose(rng).unwrap_or(&FOUR_SEVEN_EIGHT)
    }

    /// CBT exercise by case-insensitive name, or a random one
    pub fn cbt_exercise<R: Rng + ?Sized>(&self, name: Option<&str>, rng: &mut R) -> CbtExercise {
        if let Some(found) = name.and_then(|n| {
            CBT_EXERCISES
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case(n))
        }) {
            return *found;
        }
        *CBT_EXERCISES.choose(rng).unwrap_or(&THOUGHT_RECORD)
    }

    /// One random affirmation
    pub fn daily_affirmation<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        AFFIRMATIONS
            .choose(rng)
            .unwrap_or(&AFFIRMATIONS[0])
            .to_string()
    }

    /// `count` distinct affirmations, at most the whole catalog
    pub fn affirmations<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        AFFIRMATIONS
            .choose_multiple(rng, count.min(AFFIRMATIONS.len()))
            .map(|a| a.to_string())
            .collect()
    }

    /// Names of every exercise
    pub fn exercise_names(&self) -> ExerciseNames {
        ExerciseNames {
            breathing: BREATHING_EXERCISES.iter().map(|e| e.name).collect(),
            cbt: CBT_EXERCISES.iter().map(|e| e.name).collect(),
        }
    }

    /// Plan for a mood rating and dominant emotion.
    ///
    /// - 1-4: 4-7-8 Breathing + Mindfulness Check-in, 2 affirmations, 10 min
    /// - 5-7: Box Breathing + Gratitude Practice (sadness, fear, pessimism)
    ///   or Problem Solving, 3 affirmations, 15 min
    /// - 8-10: Gratitude Practice, 1 affirmation, 5 min
    pub fn create_personalized_plan<R: Rng + ?Sized>(
        &self,
        mood_rating: i64,
        dominant_emotion: &str,
        rng: &mut R,
    ) -> SelfHelpPlan {
        let (recommended_activities, affirmation_count, duration_minutes) =
            match MoodBand::from_rating(mood_rating) {
                MoodBand::Low => (
                    vec![
                        Exercise::Breathing(FOUR_SEVEN_EIGHT),
                        Exercise::Cbt(MINDFULNESS_CHECK_IN),
                    ],
                    2,
                    10,
                ),
                MoodBand::Medium => {
                    let cognitive = if GRATITUDE_EMOTIONS.iter().any(|e| *e == dominant_emotion) {
                        GRATITUDE_PRACTICE
                    } else {
                        PROBLEM_SOLVING
                    };
                    (
                        vec![Exercise::Breathing(BOX_BREATHING), Exercise::Cbt(cognitive)],
                        3,
                        15,
                    )
                }
                MoodBand::High => (vec![Exercise::Cbt(GRATITUDE_PRACTICE)], 1, 5),
            };

        SelfHelpPlan {
            recommended_activities,
            affirmations: self.affirmations(affirmation_count, rng),
            duration_minutes,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_low_mood_plan() {
        let plan = SelfHelpToolkit::new().create_personalized_plan(3, "joy", &mut rng());
        assert_eq!(plan.activity_names(), vec!["4-7-8 Breathing", "Mindfulness Check-in"]);
        assert_eq!(plan.affirmations.len(), 2);
        assert_eq!(plan.duration_minutes, 10);
    }

    #[test]
    fn test_medium_mood_sad_gets_gratitude() {
        let plan = SelfHelpToolkit::new().create_personalized_plan(6, "sadness", &mut rng());
        assert_eq!(plan.activity_names(), vec!["Box Breathing", "Gratitude Practice"]);
        assert_eq!(plan.affirmations.len(), 3);
        assert_eq!(plan.duration_minutes, 15);
    }

    #[test]
    fn test_medium_mood_other_gets_problem_solving() {
        let plan = SelfHelpToolkit::new().create_personalized_plan(5, "anger", &mut rng());
        assert_eq!(plan.activity_names(), vec!["Box Breathing", "Problem Solving"]);
    }

    #[test]
    fn test_high_mood_plan() {
        let plan = SelfHelpToolkit::new().create_personalized_plan(9, "joy", &mut rng());
        assert_eq!(plan.activity_names(), vec!["Gratitude Practice"]);
        assert_eq!(plan.affirmations.len(), 1);
        assert_eq!(plan.duration_minutes, 5);
    }

    #[test]
    fn test_band_edges() {
        let toolkit = SelfHelpToolkit::new();
        for (rating, minutes) in [(4, 10), (7, 15), (8, 5)] {
            let plan = toolkit.create_personalized_plan(rating, "fear", &mut rng());
            assert_eq!(plan.duration_minutes, minutes, "rating {rating}");
        }
    }

    #[test]
    fn test_same_seed_same_plan() {
        let toolkit = SelfHelpToolkit::new();
        let a = toolkit.create_personalized_plan(6, "joy", &mut StdRng::seed_from_u64(42));
        let b = toolkit.create_personalized_plan(6, "joy", &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_affirmations_are_unique_and_capped() {
        let toolkit = SelfHelpToolkit::new();
        let all = toolkit.affirmations(50, &mut rng());
        assert_eq!(all.len(), AFFIRMATIONS.len());
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let toolkit = SelfHelpToolkit::new();
        assert_eq!(
            toolkit
                .breathing_exercise(Some("box breathing"), &mut rng())
                .name,
            "Box Breathing"
        );
        assert_eq!(
            toolkit.cbt_exercise(Some("THOUGHT RECORD"), &mut rng()).name,
            "Thought Record"
        );
    }

    #[test]
    fn test_unknown_name_returns_catalog_entry() {
        let toolkit = SelfHelpToolkit::new();
        let exercise = toolkit.breathing_exercise(Some("nope"), &mut rng());
        assert!(BREATHING_EXERCISES.contains(&exercise));
    }

    #[test]
    fn test_catalog_sizes() {
        let names = SelfHelpToolkit::new().exercise_names();
        assert_eq!(names.breathing.len(), 3);
        assert_eq!(names.cbt.len(), 4);
        assert_eq!(AFFIRMATIONS.len(), 15);
    }
}
