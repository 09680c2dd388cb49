//! Chat completion client
//!
//! The conversational reply comes from an OpenAI-compatible
//! `/chat/completions` endpoint (OpenRouter by default). The handler only
//! sees the `ChatModel` trait, so tests swap in a fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default completion endpoint base
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";

/// System prompt sent ahead of every user message
pub const SYSTEM_PROMPT: &str = "\
You are a compassionate, non-judgmental mental health assistant trained in Cognitive Behavioral Therapy (CBT).
Your goals:
- Listen empathetically to the user's concerns.
- Help reframe negative thoughts gently using CBT techniques.
- Never give medical advice or make diagnoses.
- Be calm, supportive, and safe in tone.
- Encourage users to seek professional help when appropriate.
- Provide practical coping strategies and self-care suggestions.
";

/// Errors from the completion backend.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Transport failure or non-success status.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Response parsed but held no choices.
    #[error("Model did not return any message.")]
    EmptyResponse,
}

/// Produces one assistant reply for a system prompt and a user message.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn reply(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [RequestMessage<'a>; 2],
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

/// OpenRouter (or any OpenAI-compatible) completion client
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenRouterClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatModel for OpenRouterClient {
    async fn reply(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: &self.model,
            messages: [
                RequestMessage {
                    role: "system",
                    content: system,
                },
                RequestMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        debug!(model = %self.model, "requesting completion");
        let response: CompletionResponse = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let client =
            OpenRouterClient::new("k", DEFAULT_MODEL).with_base_url("http://localhost:9/v1/");
        assert_eq!(client.endpoint(), "http://localhost:9/v1/chat/completions");
        assert_eq!(client.model(), "mistralai/mistral-7b-instruct");
    }

    #[test]
    fn test_empty_choices_parse() {
        let parsed: CompletionResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert!(parsed.choices.is_empty());
    }
}
