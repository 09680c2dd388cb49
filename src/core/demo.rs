//! Demo data tooling: fill an empty store with realistic sample records,
//! or wipe it clean.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::info;

use crate::core::store::{RecordCounts, Store, StoreError};
use crate::types::{EmotionScores, NewActivity, NewChatMessage, NewMoodEntry};

/// Simulated classifier confidence on every sample record
const SAMPLE_SCORE: f64 = 0.9;

/// (rating, text, emotion)
const SAMPLE_MOODS: [(i64, &str, &str); 20] = [
    (8, "Had a great day at work, feeling accomplished", "joy"),
    (6, "Feeling okay, bit tired from the week", "neutral"),
    (4, "Stressed about upcoming deadlines", "anxiety"),
    (7, "Good workout session, feeling energized", "optimism"),
    (5, "Mixed day, some ups and downs", "neutral"),
    (9, "Spent quality time with family", "joy"),
    (3, "Feeling overwhelmed with responsibilities", "sadness"),
    (8, "Completed a challenging project successfully", "pride"),
    (6, "Regular day, nothing special", "neutral"),
    (7, "Had a good conversation with a friend", "joy"),
    (4, "Dealing with some personal issues", "anxiety"),
    (8, "Beautiful weather, went for a long walk", "joy"),
    (5, "Feeling uncertain about the future", "fear"),
    (7, "Made progress on personal goals", "optimism"),
    (6, "Quiet day, did some reading", "neutral"),
    (9, "Celebrated a friend's birthday", "joy"),
    (4, "Difficult conversation with colleague", "anger"),
    (7, "Learned something new today", "curiosity"),
    (5, "Feeling a bit lonely lately", "sadness"),
    (8, "Productive morning, got lots done", "pride"),
];

/// (user, bot, emotion)
const SAMPLE_CHATS: [(&str, &str, &str); 10] = [
    (
        "I'm feeling anxious about my presentation tomorrow",
        "It's natural to feel anxious before presentations. Try some deep breathing exercises and visualize a successful outcome.",
        "anxiety",
    ),
    (
        "How can I manage stress better?",
        "Here are some effective stress management techniques: regular exercise, meditation, proper sleep, and talking to friends or family.",
        "anxiety",
    ),
    (
        "I had a great day today!",
        "That's wonderful! It's important to celebrate and acknowledge these positive moments. What made your day special?",
        "joy",
    ),
    (
        "I'm feeling overwhelmed with work",
        "Feeling overwhelmed is tough. Try breaking tasks into smaller steps, prioritizing urgent items, and taking regular breaks.",
        "sadness",
    ),
    (
        "Can you suggest some breathing exercises?",
        "Try the 4-7-8 technique: Inhale for 4 counts, hold for 7, exhale for 8. Repeat 3-4 times for immediate calm.",
        "neutral",
    ),
    (
        "I accomplished my goals this week",
        "Congratulations! Achieving your goals is a great accomplishment. Take time to appreciate your hard work and progress.",
        "pride",
    ),
    (
        "I'm worried about my family",
        "Family concerns can be really stressful. Consider having an open conversation with them or seeking support from friends.",
        "fear",
    ),
    (
        "What are some ways to boost my mood?",
        "Try these mood boosters: listen to uplifting music, go for a walk, practice gratitude, connect with loved ones, or do something creative.",
        "sadness",
    ),
    (
        "I feel grateful for my friends",
        "Gratitude is a powerful emotion! Having supportive friends is truly a blessing. Consider expressing your appreciation to them.",
        "joy",
    ),
    (
        "How do I deal with negative thoughts?",
        "Try challenging negative thoughts by asking: Is this thought realistic? What would I tell a friend? Focus on facts rather than fears.",
        "anxiety",
    ),
];

/// (activity type, duration seconds, completion rating)
const SAMPLE_ACTIVITIES: [(&str, i64, i64); 10] = [
    ("breathing", 300, 4),
    ("breathing", 240, 5),
    ("meditation", 600, 3),
    ("breathing", 180, 4),
    ("affirmation", 120, 5),
    ("meditation", 900, 2),
    ("cbt", 1200, 4),
    ("breathing", 300, 5),
    ("meditation", 600, 4),
    ("affirmation", 60, 3),
];

fn sample_scores(emotion: &str) -> EmotionScores {
    let mut scores = EmotionScores::new();
    scores.insert(emotion, SAMPLE_SCORE);
    scores
}

/// Moment `0..days` days and `1..=23` hours before `now`
fn spread<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(rng.gen_range(0..days)) - Duration::hours(rng.gen_range(1..=23))
}

/// Insert the sample records and return how many of each were added.
///
/// Moods spread over the last 30 days; chats and activities over the last
/// 14, each bot reply one minute after its user message.
pub fn populate_demo<R: Rng + ?Sized>(
    store: &Store,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<RecordCounts, StoreError> {
    let mut added = RecordCounts::default();

    for (rating, text, emotion) in SAMPLE_MOODS {
        let date = now - Duration::days(rng.gen_range(0..30));
        store.insert_mood_entry(
            &NewMoodEntry::new(text, rating, sample_scores(emotion)).with_date(date),
        )?;
        added.mood_entries += 1;
    }

    for (user, bot, emotion) in SAMPLE_CHATS {
        let at = spread(rng, now, 14);
        store.insert_chat_exchange(
            &NewChatMessage::user(user, sample_scores(emotion)).with_timestamp(at),
            &NewChatMessage::bot(bot).with_timestamp(at + Duration::minutes(1)),
        )?;
        added.chat_messages += 2;
    }

    for (activity_type, duration, rating) in SAMPLE_ACTIVITIES {
        store.insert_activity(
            &NewActivity::new(activity_type)
                .with_duration(duration)
                .with_rating(rating)
                .with_timestamp(spread(rng, now, 14)),
        )?;
        added.self_help_activities += 1;
    }

    info!(
        moods = added.mood_entries,
        chats = added.chat_messages,
        activities = added.self_help_activities,
        "demo data populated"
    );
    Ok(added)
}

/// Remove every record of every kind in one transaction
pub fn reset(store: &Store) -> Result<RecordCounts, StoreError> {
    store.reset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_populate_counts() {
        let store = Store::open_in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();

        let added = populate_demo(&store, &mut rng, now).unwrap();
        assert_eq!(added.mood_entries, 20);
        assert_eq!(added.chat_messages, 20);
        assert_eq!(added.self_help_activities, 10);
        assert_eq!(store.counts().unwrap(), added);
    }

    #[test]
    fn test_populated_records_are_in_range() {
        let store = Store::open_in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let now = Utc::now();
        populate_demo(&store, &mut rng, now).unwrap();

        let moods = store.all_mood_entries().unwrap();
        assert!(moods
            .iter()
            .all(|m| m.date <= now && m.date > now - Duration::days(30)));
        assert!(moods
            .iter()
            .all(|m| m.detected_emotions.iter().all(|(_, s)| s == SAMPLE_SCORE)));

        let chats = store.all_chat_messages().unwrap();
        assert!(chats.iter().all(|c| c.timestamp > now - Duration::days(15)));
    }

    #[test]
    fn test_reset_after_populate() {
        let store = Store::open_in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        populate_demo(&store, &mut rng, Utc::now()).unwrap();

        let removed = reset(&store).unwrap();
        assert_eq!(removed.total(), 50);
        assert_eq!(store.counts().unwrap().total(), 0);
    }
}
