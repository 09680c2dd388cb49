//! HTTP API for Moodwell
//!
//! Endpoints:
//! - GET  /health                              - Health check
//! - POST /chat                                - Chat reply with emotion scores
//! - POST /mood_entry, /mood-entry             - Journal a mood, get a plan
//! - GET  /mood_entries?days, /mood-entries?limit
//! - GET  /weekly-summary, /weekly_summary     - Structured / legacy summary
//! - GET  /analytics/weekly-patterns, /analytics/mood-trends?days
//! - GET  /stats/overview, /export-data
//! - GET  /self_help/...                       - Exercises and affirmations
//! - POST /self_help/complete                  - Record an activity
//! - GET  /visualizations/...                  - Chart data
//! - POST /voice_to_text, /text_to_speech

use std::sync::{Arc, Mutex};

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{FormRejection, JsonRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    response::Json,
    routing::{get, post},
    Form, Router,
};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::core::analytics;
use crate::core::charts;
use crate::core::emotion_detector::EmotionDetector;
use crate::core::llm::{ChatModel, LlmError, SYSTEM_PROMPT};
use crate::core::store::Store;
use crate::core::toolkit::SelfHelpToolkit;
use crate::core::voice::{audio_format, VoiceEngine, DEFAULT_LANGUAGE};
use crate::error::{ApiError, ApiResult};
use crate::types::{
    BreathingExercise, CbtExercise, ChatHistory, ComprehensiveReport, EmotionScores, EntryType,
    ExportDump, LegacySummary, MoodEntry, MoodTrendChart, MoodTrendSeries, NewActivity,
    NewChatMessage, NewMoodEntry, OverviewStats, SelfHelpPlan, WeekdayPatterns,
    WeeklyHeatmapChart, WeeklySummary,
};
use crate::{
    COMPLETION_RATING_MAX, COMPLETION_RATING_MIN, MOOD_RATING_MAX, MOOD_RATING_MIN,
    SUMMARY_WINDOW_DAYS,
};

const DEFAULT_DAYS: i64 = 30;
const DEFAULT_LIMIT: usize = 10;
const DEFAULT_HEATMAP_WEEKS: i64 = 12;
const RECOMMENDED_AFFIRMATIONS: usize = 3;

/// Longest look-back accepted from a query string
const MAX_WINDOW_DAYS: i64 = 36_500;

/// Services shared by every handler
pub struct AppState {
    pub store: Store,
    pub detector: EmotionDetector,
    pub toolkit: SelfHelpToolkit,
    pub chat_model: Arc<dyn ChatModel>,
    pub voice: Arc<dyn VoiceEngine>,
    pub rng: Mutex<StdRng>,
    pub history: RwLock<ChatHistory>,
}

impl AppState {
    pub fn new(
        store: Store,
        detector: EmotionDetector,
        chat_model: Arc<dyn ChatModel>,
        voice: Arc<dyn VoiceEngine>,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            detector,
            toolkit: SelfHelpToolkit::new(),
            chat_model,
            voice,
            rng: Mutex::new(rng),
            history: RwLock::new(ChatHistory::new()),
        }
    }

    /// Run `f` with the shared random source. Never held across an await.
    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> ApiResult<T> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| ApiError::Internal(format!("random source poisoned: {e}")))?;
        Ok(f(&mut *rng))
    }
}

// =============================================================================
// Request / response bodies
// =============================================================================

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub voice_response: bool,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub detected_emotions: EmotionScores,
    pub dominant_emotion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

/// Mood entry request
#[derive(Debug, Deserialize)]
pub struct MoodEntryRequest {
    pub mood_text: String,
    pub mood_rating: i64,
    #[serde(default)]
    pub entry_type: EntryType,
}

/// Mood entry response
#[derive(Debug, Serialize)]
pub struct MoodEntryResponse {
    pub entry_id: i64,
    pub detected_emotions: EmotionScores,
    pub dominant_emotion: String,
    pub recommendations: SelfHelpPlan,
    pub message: String,
}

/// Activity completion request
#[derive(Debug, Deserialize)]
pub struct CompleteActivityRequest {
    pub activity_type: String,
    #[serde(default)]
    pub activity_name: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub completion_rating: Option<i64>,
}

/// Activity completion response
#[derive(Debug, Serialize)]
pub struct CompleteActivityResponse {
    pub message: String,
    pub activity_id: i64,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct AffirmationResponse {
    pub affirmation: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub breathing_exercises: Vec<&'static str>,
    pub cbt_exercises: Vec<&'static str>,
    pub random_breathing: BreathingExercise,
    pub random_cbt: CbtExercise,
    pub affirmations: Vec<String>,
}

/// Chart payload with its kind
#[derive(Debug, Serialize)]
pub struct ChartResponse<T> {
    pub chart: T,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SpeechResponse {
    pub audio: String,
}

#[derive(Debug, Deserialize)]
pub struct SpeechForm {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct WeeksQuery {
    pub weeks: Option<i64>,
}

// =============================================================================
// Extractor helpers
// =============================================================================

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|e| ApiError::Validation(e.body_text()))
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|e| ApiError::Validation(e.body_text()))
}

fn non_negative(name: &str, value: i64) -> ApiResult<i64> {
    if value < 0 {
        return Err(ApiError::Validation(format!(
            "'{name}' must not be negative, got {value}"
        )));
    }
    Ok(value)
}

/// Look-back length from a query string, clamped to `MAX_WINDOW_DAYS`
fn window_days(name: &str, value: i64, unit_days: i64) -> ApiResult<i64> {
    Ok(non_negative(name, value)?.min(MAX_WINDOW_DAYS / unit_days))
}

fn check_range(name: &str, value: i64, min: i64, max: i64) -> ApiResult<()> {
    if !(min..=max).contains(&value) {
        return Err(ApiError::Validation(format!(
            "'{name}' must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

/// Request time at the store's millisecond precision
fn request_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Mood entries dated within `[now - days, now]`, oldest first
fn recent_entries(state: &AppState, days: i64, now: DateTime<Utc>) -> ApiResult<Vec<MoodEntry>> {
    Ok(state
        .store
        .mood_entries_between(now - Duration::days(days), now)?)
}

// =============================================================================
// Router
// =============================================================================

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/mood_entry", post(create_mood_entry))
        .route("/mood-entry", post(create_mood_entry))
        .route("/mood_entries", get(mood_entries))
        .route("/mood-entries", get(latest_mood_entries))
        .route("/weekly-summary", get(weekly_summary))
        .route("/weekly_summary", get(legacy_weekly_summary))
        .route("/analytics/weekly-patterns", get(weekly_patterns))
        .route("/analytics/mood-trends", get(mood_trends))
        .route("/stats/overview", get(stats_overview))
        .route("/export-data", get(export_data))
        .route("/self_help/exercises", get(exercises))
        .route("/self_help/affirmation", get(affirmation))
        .route("/affirmations", get(affirmation))
        .route("/self_help/breathing/:name", get(breathing_exercise))
        .route("/self_help/cbt/:name", get(cbt_exercise))
        .route("/self_help/complete", post(complete_activity))
        .route("/self-help-recommendations", get(recommendations))
        .route("/visualizations/mood_trend", get(mood_trend_chart))
        .route("/visualizations/weekly_heatmap", get(weekly_heatmap_chart))
        .route(
            "/visualizations/comprehensive_report",
            get(comprehensive_report),
        )
        .route("/voice_to_text", post(voice_to_text))
        .route("/text_to_speech", post(text_to_speech))
        .fallback(not_found)
        .with_state(state)
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

// =============================================================================
// Chat
// =============================================================================

/// Classify, ask the model, persist both sides, answer
async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let req = json_body(body)?;
    let message = req.message.trim();
    if message.is_empty() {
        return Err(ApiError::Validation(
            "Missing or empty 'message' field in request body.".to_string(),
        ));
    }

    let emotions = state.detector.detect_emotions(message).await;
    let dominant = state.detector.dominant_emotion(&emotions);

    let reply = state
        .chat_model
        .reply(SYSTEM_PROMPT, message)
        .await
        .map_err(|e| match e {
            LlmError::EmptyResponse => ApiError::Upstream(e.to_string()),
            LlmError::Http(_) => ApiError::Upstream(format!("Error contacting model: {e}")),
        })?;

    state.store.insert_chat_exchange(
        &NewChatMessage::user(message, emotions.clone()),
        &NewChatMessage::bot(reply.clone()),
    )?;
    state.history.write().await.push_exchange(message, &reply);
    info!(dominant = %dominant, "chat exchange stored");

    let audio = if req.voice_response {
        state.voice.text_to_speech(&reply, DEFAULT_LANGUAGE).await
    } else {
        None
    };

    Ok(Json(ChatResponse {
        response: reply,
        detected_emotions: emotions,
        dominant_emotion: dominant,
        audio,
    }))
}

// =============================================================================
// Mood journal
// =============================================================================

async fn create_mood_entry(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MoodEntryRequest>, JsonRejection>,
) -> ApiResult<Json<MoodEntryResponse>> {
    let req = json_body(body)?;
    check_range(
        "mood_rating",
        req.mood_rating,
        MOOD_RATING_MIN,
        MOOD_RATING_MAX,
    )?;

    let emotions = state.detector.detect_emotions(&req.mood_text).await;
    let dominant = state.detector.dominant_emotion(&emotions);

    let entry = state.store.insert_mood_entry(
        &NewMoodEntry::new(req.mood_text, req.mood_rating, emotions.clone())
            .with_entry_type(req.entry_type),
    )?;
    let plan = state.with_rng(|rng| {
        state
            .toolkit
            .create_personalized_plan(req.mood_rating, &dominant, rng)
    })?;
    info!(
        entry_id = entry.id,
        rating = entry.mood_rating,
        "mood entry stored"
    );

    Ok(Json(MoodEntryResponse {
        entry_id: entry.id,
        detected_emotions: emotions,
        dominant_emotion: dominant,
        recommendations: plan,
        message: "Mood entry saved successfully!".to_string(),
    }))
}

/// Entries from the last `days` days, newest first
async fn mood_entries(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DaysQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<MoodEntry>>> {
    let days = window_days("days", query(params)?.days.unwrap_or(DEFAULT_DAYS), 1)?;
    let now = request_now();
    let mut entries = recent_entries(&state, days, now)?;
    entries.reverse();
    Ok(Json(entries))
}

/// The latest `limit` entries, newest first
async fn latest_mood_entries(
    State(state): State<Arc<AppState>>,
    params: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<MoodEntry>>> {
    let limit = query(params)?.limit.unwrap_or(DEFAULT_LIMIT);
    Ok(Json(state.store.latest_mood_entries(limit)?))
}

// =============================================================================
// Analytics
// =============================================================================

async fn weekly_summary(State(state): State<Arc<AppState>>) -> ApiResult<Json<WeeklySummary>> {
    let now = request_now();
    let entries = recent_entries(&state, SUMMARY_WINDOW_DAYS, now)?;
    Ok(Json(analytics::weekly_summary(&entries, now)))
}

async fn legacy_weekly_summary(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<LegacySummary>> {
    let now = request_now();
    let entries = recent_entries(&state, SUMMARY_WINDOW_DAYS, now)?;
    let history = state.history.read().await;
    Ok(Json(analytics::legacy_summary(&history, &entries, now)))
}

async fn weekly_patterns(State(state): State<Arc<AppState>>) -> ApiResult<Json<WeekdayPatterns>> {
    let entries = state.store.all_mood_entries()?;
    Ok(Json(analytics::weekday_patterns(&entries)))
}

async fn mood_trends(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DaysQuery>, QueryRejection>,
) -> ApiResult<Json<MoodTrendSeries>> {
    let days = window_days("days", query(params)?.days.unwrap_or(DEFAULT_DAYS), 1)?;
    let now = request_now();
    let entries = recent_entries(&state, days, now)?;
    Ok(Json(analytics::mood_trend_series(&entries, days, now)))
}

async fn stats_overview(State(state): State<Arc<AppState>>) -> ApiResult<Json<OverviewStats>> {
    let counts = state.store.counts()?;
    let now = request_now();
    let entries = recent_entries(&state, SUMMARY_WINDOW_DAYS, now)?;
    Ok(Json(analytics::overview(counts, &entries, now)))
}

async fn export_data(State(state): State<Arc<AppState>>) -> ApiResult<Json<ExportDump>> {
    Ok(Json(analytics::export(
        state.store.all_mood_entries()?,
        state.store.all_chat_messages()?,
        state.store.all_activities()?,
        request_now(),
    )))
}

// =============================================================================
// Self-help
// =============================================================================

async fn exercises(State(state): State<Arc<AppState>>) -> Json<crate::types::ExerciseNames> {
    Json(state.toolkit.exercise_names())
}

async fn affirmation(State(state): State<Arc<AppState>>) -> ApiResult<Json<AffirmationResponse>> {
    let affirmation = state.with_rng(|rng| state.toolkit.daily_affirmation(rng))?;
    Ok(Json(AffirmationResponse { affirmation }))
}

/// Named breathing exercise; an unknown name yields a random one
async fn breathing_exercise(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<BreathingExercise>> {
    let exercise = state.with_rng(|rng| state.toolkit.breathing_exercise(Some(&name), rng))?;
    Ok(Json(exercise))
}

/// Named CBT exercise; an unknown name yields a random one
async fn cbt_exercise(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<CbtExercise>> {
    let exercise = state.with_rng(|rng| state.toolkit.cbt_exercise(Some(&name), rng))?;
    Ok(Json(exercise))
}

async fn complete_activity(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CompleteActivityRequest>, JsonRejection>,
) -> ApiResult<Json<CompleteActivityResponse>> {
    let req = json_body(body)?;
    if req.activity_type.trim().is_empty() {
        return Err(ApiError::Validation(
            "'activity_type' must not be empty".to_string(),
        ));
    }
    if let Some(rating) = req.completion_rating {
        check_range(
            "completion_rating",
            rating,
            COMPLETION_RATING_MIN,
            COMPLETION_RATING_MAX,
        )?;
    }
    if let Some(seconds) = req.duration_seconds {
        non_negative("duration_seconds", seconds)?;
    }

    let mut activity = NewActivity::new(req.activity_type.trim());
    activity.duration_seconds = req.duration_seconds;
    activity.completion_rating = req.completion_rating;
    let stored = state.store.insert_activity(&activity)?;
    info!(
        activity_id = stored.id,
        activity_type = %stored.activity_type,
        name = req.activity_name.as_deref().unwrap_or("-"),
        "activity recorded"
    );

    Ok(Json(CompleteActivityResponse {
        message: "Activity completion recorded!".to_string(),
        activity_id: stored.id,
    }))
}

async fn recommendations(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RecommendationsResponse>> {
    let names = state.toolkit.exercise_names();
    let (random_breathing, random_cbt, affirmations) = state.with_rng(|rng| {
        (
            state.toolkit.breathing_exercise(None, rng),
            state.toolkit.cbt_exercise(None, rng),
            state.toolkit.affirmations(RECOMMENDED_AFFIRMATIONS, rng),
        )
    })?;

    Ok(Json(RecommendationsResponse {
        breathing_exercises: names.breathing,
        cbt_exercises: names.cbt,
        random_breathing,
        random_cbt,
        affirmations,
    }))
}

// =============================================================================
// Chart data
// =============================================================================

async fn mood_trend_chart(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DaysQuery>, QueryRejection>,
) -> ApiResult<Json<ChartResponse<MoodTrendChart>>> {
    let days = window_days("days", query(params)?.days.unwrap_or(DEFAULT_DAYS), 1)?;
    let now = request_now();
    let entries = recent_entries(&state, days, now)?;
    Ok(Json(ChartResponse {
        chart: charts::mood_trend(&entries, days, now),
        kind: "mood_trend",
    }))
}

async fn weekly_heatmap_chart(
    State(state): State<Arc<AppState>>,
    params: Result<Query<WeeksQuery>, QueryRejection>,
) -> ApiResult<Json<ChartResponse<WeeklyHeatmapChart>>> {
    let weeks = window_days(
        "weeks",
        query(params)?.weeks.unwrap_or(DEFAULT_HEATMAP_WEEKS),
        7,
    )?;
    let now = request_now();
    let entries = recent_entries(&state, weeks * 7, now)?;
    Ok(Json(ChartResponse {
        chart: charts::weekly_heatmap(&entries, weeks, now),
        kind: "weekly_heatmap",
    }))
}

async fn comprehensive_report(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DaysQuery>, QueryRejection>,
) -> ApiResult<Json<ComprehensiveReport>> {
    let days = window_days("days", query(params)?.days.unwrap_or(DEFAULT_DAYS), 1)?;
    let now = request_now();
    let entries = recent_entries(&state, days, now)?;
    Ok(Json(charts::comprehensive_report(&entries, days, now)))
}

// =============================================================================
// Voice
// =============================================================================

/// Transcribe the multipart `audio` field
async fn voice_to_text(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<TranscriptResponse>> {
    let mut multipart = multipart.map_err(|e| ApiError::Validation(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.body_text()))?
    {
        if field.name() == Some("audio") {
            let format = audio_format(field.file_name());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(e.body_text()))?;
            upload = Some((bytes, format));
            break;
        }
    }

    let (bytes, format) = upload.ok_or_else(|| {
        ApiError::Validation("Missing 'audio' file in request body.".to_string())
    })?;

    match state.voice.speech_to_text(&bytes, &format).await {
        Some(text) => Ok(Json(TranscriptResponse { text })),
        None => Err(ApiError::Upstream("Failed to transcribe audio".to_string())),
    }
}

async fn text_to_speech(
    State(state): State<Arc<AppState>>,
    form: Result<Form<SpeechForm>, FormRejection>,
) -> ApiResult<Json<SpeechResponse>> {
    let Form(form) = form.map_err(|e| ApiError::Validation(e.body_text()))?;
    match state.voice.text_to_speech(&form.text, DEFAULT_LANGUAGE).await {
        Some(audio) => Ok(Json(SpeechResponse { audio })),
        None => Err(ApiError::Upstream("Failed to generate speech".to_string())),
    }
}

/// Run the API server
pub async fn run_server(addr: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Moodwell API listening");
    axum::serve(listener, router).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::OpenRouterClient;
    use crate::core::voice::NoVoice;
    use rand::SeedableRng;

    fn state() -> AppState {
        AppState::new(
            Store::open_in_memory().unwrap(),
            EmotionDetector::new(),
            Arc::new(OpenRouterClient::new("", "unused")),
            Arc::new(NoVoice),
            StdRng::seed_from_u64(0),
        )
    }

    #[test]
    fn test_window_start_is_shared_by_store_and_analytics() {
        let state = state();
        let now = request_now();
        let start = now - Duration::days(SUMMARY_WINDOW_DAYS);
        let entry = NewMoodEntry::new("edge", 6, EmotionScores::new()).with_date(start);
        state.store.insert_mood_entry(&entry).unwrap();

        let entries = recent_entries(&state, SUMMARY_WINDOW_DAYS, now).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(analytics::weekly_summary(&entries, now).total_entries, 1);

        let counts = state.store.counts().unwrap();
        assert_eq!(analytics::overview(counts, &entries, now).streak_days, 1);
    }

    #[test]
    fn test_request_now_has_millisecond_precision() {
        assert_eq!(request_now().timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
