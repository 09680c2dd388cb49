//! Runtime configuration and service wiring
//!
//! `main` fills an `AppConfig` from CLI flags and environment variables;
//! everything else is built from it here, once, at startup.

use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::core::api::AppState;
use crate::core::emotion_detector::EmotionDetector;
use crate::core::emotion_model::HttpEmotionModel;
use crate::core::llm::{ChatModel, OpenRouterClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::store::{Store, StoreError};
use crate::core::voice::{HttpVoiceEngine, VoiceEngine};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_DB_PATH: &str = "./mental_health.db";

/// Everything the service needs to start
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: String,
    pub db_path: PathBuf,
    pub llm_url: String,
    pub llm_model: String,
    pub api_key: Option<String>,
    pub emotion_model_url: Option<String>,
    pub tts_url: Option<String>,
    pub stt_url: Option<String>,
    /// Fixed seed for recommendation sampling; entropy when absent
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            llm_url: DEFAULT_BASE_URL.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            api_key: None,
            emotion_model_url: None,
            tts_url: None,
            stt_url: None,
            seed: None,
        }
    }
}

impl AppConfig {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn detector(&self) -> EmotionDetector {
        match &self.emotion_model_url {
            Some(url) => {
                info!(%url, "emotion classifier configured");
                EmotionDetector::with_model(Arc::new(HttpEmotionModel::new(url.clone())))
            }
            None => {
                info!("no emotion classifier configured, using keyword estimator");
                EmotionDetector::new()
            }
        }
    }

    pub fn chat_model(&self) -> Arc<dyn ChatModel> {
        if self.api_key.is_none() {
            warn!("no API key set for the chat model; requests will likely be rejected");
        }
        Arc::new(
            OpenRouterClient::new(
                self.api_key.clone().unwrap_or_default(),
                self.llm_model.clone(),
            )
            .with_base_url(self.llm_url.clone()),
        )
    }

    pub fn voice(&self) -> Arc<dyn VoiceEngine> {
        Arc::new(HttpVoiceEngine::new(self.tts_url.clone(), self.stt_url.clone()))
    }

    pub fn open_store(&self) -> Result<Store, StoreError> {
        Store::open(&self.db_path)
    }

    /// Open the store and build every service
    pub fn build_state(&self) -> Result<AppState, StoreError> {
        Ok(AppState::new(
            self.open_store()?,
            self.detector(),
            self.chat_model(),
            self.voice(),
            self.rng(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.addr, "127.0.0.1:8000");
        assert_eq!(config.llm_model, "mistralai/mistral-7b-instruct");
        assert!(!config.detector().has_model());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = AppConfig {
            seed: Some(42),
            ..AppConfig::default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_state_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            db_path: dir.path().join("state.db"),
            ..AppConfig::default()
        };
        let state = config.build_state().unwrap();
        assert_eq!(state.store.counts().unwrap().total(), 0);
    }
}
