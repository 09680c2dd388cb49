//! Self-help exercises and personalized plans

use serde::Serialize;

/// A guided breathing exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreathingExercise {
    pub name: &'static str,
    pub instructions: &'static str,
    /// Seconds
    pub duration: u32,
    pub steps: &'static [&'static str],
}

/// A cognitive (CBT) exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CbtExercise {
    pub name: &'static str,
    pub description: &'static str,
    pub steps: &'static [&'static str],
}

/// Either kind of exercise, serialized as its own fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Exercise {
    Breathing(BreathingExercise),
    Cbt(CbtExercise),
}

impl Exercise {
    pub fn name(&self) -> &'static str {
        match self {
            Exercise::Breathing(e) => e.name,
            Exercise::Cbt(e) => e.name,
        }
    }
}

/// Recommendations computed for one mood submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfHelpPlan {
    pub recommended_activities: Vec<Exercise>,
    pub affirmations: Vec<String>,
    pub duration_minutes: u32,
}

impl SelfHelpPlan {
    /// Names of the recommended exercises, in plan order
    pub fn activity_names(&self) -> Vec<&'static str> {
        self.recommended_activities.iter().map(Exercise::name).collect()
    }
}

/// Names of every exercise in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseNames {
    pub breathing: Vec<&'static str>,
    pub cbt: Vec<&'static str>,
}
