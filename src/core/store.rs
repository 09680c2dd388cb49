//! SQLite-backed record store for mood entries, chat messages and
//! self-help activities.
//!
//! Timestamps are stored as UTC epoch milliseconds. Emotion scores are
//! stored as a JSON object; older rows holding a list or a bare string are
//! read through `EmotionScores::from_legacy_json`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use tracing::info;

use crate::types::{
    ChatMessage, ChatRole, EmotionScores, EntryType, MoodEntry, NewActivity, NewChatMessage,
    NewMoodEntry, SelfHelpActivity,
};
use crate::{
    COMPLETION_RATING_MAX, COMPLETION_RATING_MIN, DEFAULT_USER_ID, MOOD_RATING_MAX,
    MOOD_RATING_MIN,
};

/// DDL for the three record tables. Idempotent.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS mood_entries (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id           TEXT NOT NULL DEFAULT 'default_user',
    date              INTEGER NOT NULL,
    mood_text         TEXT NOT NULL,
    mood_rating       INTEGER NOT NULL CHECK (mood_rating BETWEEN 1 AND 10),
    detected_emotions TEXT,
    entry_type        TEXT NOT NULL DEFAULT 'text'
);

CREATE INDEX IF NOT EXISTS idx_mood_entries_date ON mood_entries(date);

CREATE TABLE IF NOT EXISTS chat_messages (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id           TEXT NOT NULL DEFAULT 'default_user',
    timestamp         INTEGER NOT NULL,
    role              TEXT NOT NULL CHECK (role IN ('user', 'bot')),
    content           TEXT NOT NULL,
    detected_emotions TEXT
);

CREATE INDEX IF NOT EXISTS idx_chat_messages_timestamp ON chat_messages(timestamp);

CREATE TABLE IF NOT EXISTS self_help_activities (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id           TEXT NOT NULL DEFAULT 'default_user',
    activity_type     TEXT NOT NULL,
    timestamp         INTEGER NOT NULL,
    duration_seconds  INTEGER,
    completion_rating INTEGER
);
"#;

const MOOD_COLUMNS: &str =
    "id, user_id, date, mood_text, mood_rating, detected_emotions, entry_type";
const CHAT_COLUMNS: &str = "id, user_id, timestamp, role, content, detected_emotions";
const ACTIVITY_COLUMNS: &str =
    "id, user_id, activity_type, timestamp, duration_seconds, completion_rating";

/// Row counts per record kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct RecordCounts {
    pub mood_entries: usize,
    pub chat_messages: usize,
    pub self_help_activities: usize,
}

impl RecordCounts {
    pub fn total(&self) -> usize {
        self.mood_entries + self.chat_messages + self.self_help_activities
    }
}

/// Errors from the SQLite store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid record: {0}")]
    Invalid(String),

    #[error("lock poisoned: {0}")]
    Lock(String),
}

/// SQLite record store.
///
/// Thread-safe via an internal `Mutex<Connection>`; every write is a
/// single commit.
#[derive(Debug)]
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the database file at `path` and apply the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        info!(path = %path.display(), "store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Fresh in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a mood entry. Rating must be 1-10.
    pub fn insert_mood_entry(&self, entry: &NewMoodEntry) -> Result<MoodEntry, StoreError> {
        if !(MOOD_RATING_MIN..=MOOD_RATING_MAX).contains(&entry.mood_rating) {
            return Err(StoreError::Invalid(format!(
                "mood_rating must be between {} and {}, got {}",
                MOOD_RATING_MIN, MOOD_RATING_MAX, entry.mood_rating
            )));
        }
        let emotions = serde_json::to_string(&entry.detected_emotions)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO mood_entries \
             (user_id, date, mood_text, mood_rating, detected_emotions, entry_type) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                DEFAULT_USER_ID,
                entry.date.timestamp_millis(),
                entry.mood_text,
                entry.mood_rating,
                emotions,
                entry.entry_type.as_str()
            ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(MoodEntry {
            id,
            user_id: DEFAULT_USER_ID.to_string(),
            date: truncate_to_millis(entry.date),
            mood_text: entry.mood_text.clone(),
            mood_rating: entry.mood_rating,
            detected_emotions: entry.detected_emotions.clone(),
            entry_type: entry.entry_type,
        })
    }

    /// Insert a user message and the bot reply in one transaction
    pub fn insert_chat_exchange(
        &self,
        user: &NewChatMessage,
        bot: &NewChatMessage,
    ) -> Result<(ChatMessage, ChatMessage), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let user = insert_chat(&tx, user)?;
        let bot = insert_chat(&tx, bot)?;
        tx.commit()?;
        Ok((user, bot))
    }

    /// Insert an activity completion. Completion rating, when given, must be 1-5.
    pub fn insert_activity(&self, activity: &NewActivity) -> Result<SelfHelpActivity, StoreError> {
        if let Some(rating) = activity.completion_rating {
            if !(COMPLETION_RATING_MIN..=COMPLETION_RATING_MAX).contains(&rating) {
                return Err(StoreError::Invalid(format!(
                    "completion_rating must be between {} and {}, got {}",
                    COMPLETION_RATING_MIN, COMPLETION_RATING_MAX, rating
                )));
            }
        }
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO self_help_activities \
             (user_id, activity_type, timestamp, duration_seconds, completion_rating) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                DEFAULT_USER_ID,
                activity.activity_type,
                activity.timestamp.timestamp_millis(),
                activity.duration_seconds,
                activity.completion_rating
            ],
        )?;
        Ok(SelfHelpActivity {
            id: conn.last_insert_rowid(),
            user_id: DEFAULT_USER_ID.to_string(),
            activity_type: activity.activity_type.clone(),
            timestamp: truncate_to_millis(activity.timestamp),
            duration_seconds: activity.duration_seconds,
            completion_rating: activity.completion_rating,
        })
    }

    /// Delete every record of every kind. Returns what was removed.
    pub fn reset(&self) -> Result<RecordCounts, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let counts = RecordCounts {
            mood_entries: tx.execute("DELETE FROM mood_entries", [])?,
            chat_messages: tx.execute("DELETE FROM chat_messages", [])?,
            self_help_activities: tx.execute("DELETE FROM self_help_activities", [])?,
        };
        tx.commit()?;
        info!(removed = counts.total(), "store reset");
        Ok(counts)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Mood entries dated within `[start, end]`, oldest first
    pub fn mood_entries_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MoodEntry>, StoreError> {
        let sql = format!(
            "SELECT {MOOD_COLUMNS} FROM mood_entries \
             WHERE date >= ?1 AND date <= ?2 ORDER BY date ASC, id ASC"
        );
        self.query(
            &sql,
            params![start.timestamp_millis(), end.timestamp_millis()],
            row_to_mood,
        )
    }

    /// Every mood entry, oldest first
    pub fn all_mood_entries(&self) -> Result<Vec<MoodEntry>, StoreError> {
        let sql = format!("SELECT {MOOD_COLUMNS} FROM mood_entries ORDER BY date ASC, id ASC");
        self.query(&sql, [], row_to_mood)
    }

    /// The `limit` most recent mood entries, newest first
    pub fn latest_mood_entries(&self, limit: usize) -> Result<Vec<MoodEntry>, StoreError> {
        let sql = format!(
            "SELECT {MOOD_COLUMNS} FROM mood_entries ORDER BY date DESC, id DESC LIMIT ?1"
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query(&sql, params![limit], row_to_mood)
    }

    /// Every chat message, oldest first
    pub fn all_chat_messages(&self) -> Result<Vec<ChatMessage>, StoreError> {
        let sql =
            format!("SELECT {CHAT_COLUMNS} FROM chat_messages ORDER BY timestamp ASC, id ASC");
        self.query(&sql, [], row_to_chat)
    }

    /// Every activity, oldest first
    pub fn all_activities(&self) -> Result<Vec<SelfHelpActivity>, StoreError> {
        let sql = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM self_help_activities ORDER BY timestamp ASC, id ASC"
        );
        self.query(&sql, [], row_to_activity)
    }

    /// Row counts per kind
    pub fn counts(&self) -> Result<RecordCounts, StoreError> {
        let conn = self.lock()?;
        let count = |table: &str| -> Result<usize, StoreError> {
            let n: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
            Ok(usize::try_from(n).unwrap_or(0))
        };
        Ok(RecordCounts {
            mood_entries: count("mood_entries")?,
            chat_messages: count("chat_messages")?,
            self_help_activities: count("self_help_activities")?,
        })
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Acquire the connection mutex.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, StoreError>
    where
        P: rusqlite::Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

fn insert_chat(conn: &Connection, message: &NewChatMessage) -> Result<ChatMessage, StoreError> {
    let emotions = message
        .detected_emotions
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    conn.execute(
        "INSERT INTO chat_messages (user_id, timestamp, role, content, detected_emotions) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            DEFAULT_USER_ID,
            message.timestamp.timestamp_millis(),
            message.role.as_str(),
            message.content,
            emotions
        ],
    )?;
    Ok(ChatMessage {
        id: conn.last_insert_rowid(),
        user_id: DEFAULT_USER_ID.to_string(),
        timestamp: truncate_to_millis(message.timestamp),
        role: message.role,
        content: message.content.clone(),
        detected_emotions: message.detected_emotions.clone(),
    })
}

// ---------------------------------------------------------------------------
// Row conversion helpers
// ---------------------------------------------------------------------------

fn row_to_mood(row: &Row<'_>) -> rusqlite::Result<MoodEntry> {
    let entry_type: String = row.get(6)?;
    Ok(MoodEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: millis_column(row, 2)?,
        mood_text: row.get(3)?,
        mood_rating: row.get(4)?,
        detected_emotions: emotions_column(row, 5)?.unwrap_or_default(),
        entry_type: EntryType::from_tag(&entry_type),
    })
}

fn row_to_chat(row: &Row<'_>) -> rusqlite::Result<ChatMessage> {
    let role: String = row.get(3)?;
    let role = ChatRole::from_tag(&role).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("unknown chat role: {role}").into(),
        )
    })?;
    Ok(ChatMessage {
        id: row.get(0)?,
        user_id: row.get(1)?,
        timestamp: millis_column(row, 2)?,
        role,
        content: row.get(4)?,
        detected_emotions: emotions_column(row, 5)?,
    })
}

fn row_to_activity(row: &Row<'_>) -> rusqlite::Result<SelfHelpActivity> {
    Ok(SelfHelpActivity {
        id: row.get(0)?,
        user_id: row.get(1)?,
        activity_type: row.get(2)?,
        timestamp: millis_column(row, 3)?,
        duration_seconds: row.get(4)?,
        completion_rating: row.get(5)?,
    })
}

fn millis_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(idx)?;
    Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp out of range: {millis}").into(),
        )
    })
}

/// NULL → None; anything else goes through the legacy shim.
/// Text that is not JSON at all is read as a bare label.
fn emotions_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<EmotionScores>> {
    let raw: Option<String> = row.get(idx)?;
    Ok(raw.map(|text| {
        let value = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
        EmotionScores::from_legacy_json(&value)
    }))
}

fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(dt.timestamp_millis())
        .single()
        .unwrap_or(dt)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn scores(label: &str, score: f64) -> EmotionScores {
        [(label.to_string(), score)].into_iter().collect()
    }

    #[test]
    fn test_empty_store_counts() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.counts().unwrap(), RecordCounts::default());
        assert!(store.all_mood_entries().unwrap().is_empty());
    }

    #[test]
    fn test_mood_entry_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let entry = NewMoodEntry::new("feeling good", 8, scores("joy", 0.9))
            .with_entry_type(EntryType::Voice);
        let stored = store.insert_mood_entry(&entry).unwrap();

        let read = store.all_mood_entries().unwrap();
        assert_eq!(read, vec![stored]);
        assert_eq!(read[0].user_id, DEFAULT_USER_ID);
        assert_eq!(read[0].entry_type, EntryType::Voice);
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let store = Store::open_in_memory().unwrap();
        for rating in [0, 11] {
            let err = store
                .insert_mood_entry(&NewMoodEntry::new("x", rating, EmotionScores::new()))
                .unwrap_err();
            assert!(matches!(err, StoreError::Invalid(_)));
        }
        assert_eq!(store.counts().unwrap().mood_entries, 0);
    }

    #[test]
    fn test_completion_rating_out_of_range_rejected() {
        let store = Store::open_in_memory().unwrap();
        let err = store
            .insert_activity(&NewActivity::new("breathing").with_rating(6))
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn test_between_filters_and_orders() {
        let store = Store::open_in_memory().unwrap();
        let now = Utc::now();
        for (days_ago, rating) in [(1, 5), (10, 3), (3, 7)] {
            let entry = NewMoodEntry::new("x", rating, EmotionScores::new())
                .with_date(now - Duration::days(days_ago));
            store.insert_mood_entry(&entry).unwrap();
        }

        let week = store
            .mood_entries_between(now - Duration::days(7), now)
            .unwrap();
        let ratings: Vec<i64> = week.iter().map(|e| e.mood_rating).collect();
        assert_eq!(ratings, vec![7, 5]);

        let latest = store.latest_mood_entries(2).unwrap();
        assert_eq!(latest.iter().map(|e| e.mood_rating).collect::<Vec<_>>(), vec![5, 7]);
    }

    #[test]
    fn test_chat_exchange_keeps_bot_scores_empty() {
        let store = Store::open_in_memory().unwrap();
        let (user, bot) = store
            .insert_chat_exchange(
                &NewChatMessage::user("I'm worried", scores("fear", 1.0)),
                &NewChatMessage::bot("Let's breathe together."),
            )
            .unwrap();
        assert!(user.id < bot.id);

        let all = store.all_chat_messages().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].role, ChatRole::User);
        assert!(all[0].detected_emotions.is_some());
        assert_eq!(all[1].detected_emotions, None);
    }

    #[test]
    fn test_legacy_emotion_shapes_read_back() {
        let store = Store::open_in_memory().unwrap();
        {
            let conn = store.lock().unwrap();
            for raw in [r#"["joy","joy"]"#, r#""sadness""#, "anxiety"] {
                conn.execute(
                    "INSERT INTO mood_entries (date, mood_text, mood_rating, detected_emotions) \
                     VALUES (?1, 'x', 5, ?2)",
                    params![Utc::now().timestamp_millis(), raw],
                )
                .unwrap();
            }
        }
        let entries = store.all_mood_entries().unwrap();
        assert_eq!(entries[0].detected_emotions.get("joy"), Some(2.0));
        assert_eq!(entries[1].detected_emotions.dominant(), "sadness");
        assert_eq!(entries[2].detected_emotions.dominant(), "anxiety");
    }

    #[test]
    fn test_reset_clears_everything() {
        let store = Store::open_in_memory().unwrap();
        store
            .insert_mood_entry(&NewMoodEntry::new("x", 5, EmotionScores::new()))
            .unwrap();
        store.insert_activity(&NewActivity::new("cbt")).unwrap();

        let removed = store.reset().unwrap();
        assert_eq!(removed.total(), 2);
        assert_eq!(store.counts().unwrap().total(), 0);
    }

    #[test]
    fn test_open_on_disk_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mood.db");
        {
            let store = Store::open(&path).unwrap();
            store.insert_activity(&NewActivity::new("breathing").with_duration(120)).unwrap();
        }
        let store = Store::open(&path).unwrap();
        let activities = store.all_activities().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].duration_seconds, Some(120));
    }
}
