//! Primary emotion classifier backend
//!
//! The multi-label network runs out of process. This module only speaks to
//! it: text goes out, one raw logit per label comes back in canonical order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::EMOTION_LABELS;

/// Errors from the classifier backend. Never leave `EmotionDetector`.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classifier returned status {0}")]
    Status(u16),

    #[error("malformed classifier response: {0}")]
    Malformed(String),
}

/// A multi-label emotion classifier.
///
/// Returns raw logits for the 11 labels in canonical order; the caller
/// applies the per-label sigmoid.
#[async_trait]
pub trait EmotionModel: Send + Sync {
    async fn logits(&self, text: &str) -> Result<[f64; 11], ModelError>;
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    logits: Vec<f64>,
}

/// Classifier served over HTTP.
///
/// POSTs `{"inputs": text}` to the configured URL and expects
/// `{"logits": [..11 floats..]}`.
pub struct HttpEmotionModel {
    client: reqwest::Client,
    url: String,
}

impl HttpEmotionModel {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl EmotionModel for HttpEmotionModel {
    async fn logits(&self, text: &str) -> Result<[f64; 11], ModelError> {
        let response = self
            .client
            .post(&self.url)
            .json(&ClassifyRequest { inputs: text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::Status(status.as_u16()));
        }

        let body: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Malformed(e.to_string()))?;

        let count = body.logits.len();
        body.logits.try_into().map_err(|_| {
            ModelError::Malformed(format!(
                "expected {} logits, got {}",
                EMOTION_LABELS.len(),
                count
            ))
        })
    }
}
