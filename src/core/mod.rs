//! Core modules for Moodwell

pub mod analytics;
pub mod api;
pub mod charts;
pub mod demo;
pub mod emotion_detector;
pub mod emotion_model;
pub mod llm;
pub mod store;
pub mod toolkit;
pub mod voice;

pub use api::{create_router, run_server, AppState};
pub use emotion_detector::{detect_with_keywords, EmotionDetector};
pub use emotion_model::{EmotionModel, HttpEmotionModel, ModelError};
pub use llm::{ChatModel, LlmError, OpenRouterClient};
pub use store::{RecordCounts, Store, StoreError};
pub use toolkit::SelfHelpToolkit;
pub use voice::{HttpVoiceEngine, NoVoice, VoiceEngine};
