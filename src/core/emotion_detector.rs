//! Emotion detector: text → score per emotion label
//!
//! Uses the primary multi-label classifier when one is configured and falls
//! back to a keyword estimator otherwise. Never fails.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::emotion_model::EmotionModel;
use crate::types::EmotionScores;
use crate::{KEYWORD_INCREMENT, MAX_CLASSIFIER_TOKENS};

// =============================================================================
// Fallback keyword table: (label, keywords)
// =============================================================================

const EMOTION_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "joy",
        &["happy", "joyful", "excited", "great", "wonderful", "amazing", "fantastic"],
    ),
    (
        "sadness",
        &["sad", "depressed", "down", "unhappy", "miserable", "gloomy"],
    ),
    (
        "anger",
        &["angry", "mad", "furious", "irritated", "annoyed", "rage"],
    ),
    (
        "fear",
        &["scared", "afraid", "anxious", "worried", "nervous", "terrified"],
    ),
    ("surprise", &["surprised", "shocked", "amazed", "astonished"]),
    ("disgust", &["disgusted", "revolted", "repulsed", "sick"]),
    ("trust", &["trust", "confident", "secure", "safe", "reliable"]),
    (
        "anticipation",
        &["excited", "looking forward", "anticipating", "eager"],
    ),
    ("love", &["love", "adore", "cherish", "affection", "care"]),
    ("optimism", &["optimistic", "hopeful", "positive", "bright"]),
    ("pessimism", &["pessimistic", "hopeless", "negative", "dark"]),
];

/// Emotion detector with an optional primary classifier
#[derive(Clone, Default)]
pub struct EmotionDetector {
    model: Option<Arc<dyn EmotionModel>>,
}

impl std::fmt::Debug for EmotionDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmotionDetector")
            .field("has_model", &self.model.is_some())
            .finish()
    }
}

impl EmotionDetector {
    /// Keyword-only detector
    pub fn new() -> Self {
        Self { model: None }
    }

    /// Detector backed by a primary classifier
    pub fn with_model(model: Arc<dyn EmotionModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Score every label for `text`.
    ///
    /// The result always holds exactly the 11 fixed labels.
    pub async fn detect_emotions(&self, text: &str) -> EmotionScores {
        let model = match &self.model {
            Some(model) if !text.trim().is_empty() => model,
            _ => return detect_with_keywords(text),
        };

        let input = truncate_tokens(text, MAX_CLASSIFIER_TOKENS);
        match model.logits(&input).await {
            Ok(logits) => {
                debug!("emotion scores from primary classifier");
                EmotionScores::from_canonical(logits.map(sigmoid))
            }
            Err(e) => {
                warn!(error = %e, "emotion classifier failed, using keyword fallback");
                detect_with_keywords(text)
            }
        }
    }

    /// Label with the highest score, `"neutral"` for an empty mapping
    pub fn dominant_emotion(&self, emotions: &EmotionScores) -> String {
        emotions.dominant()
    }
}

/// Keyword estimator.
///
/// Each keyword found as a substring of the lower-cased text adds 0.3 to its
/// label. Scores are then divided by their total, or all left at zero when
/// nothing matched.
pub fn detect_with_keywords(text: &str) -> EmotionScores {
    let text_lower = text.to_lowercase();
    let mut scores = EmotionScores::zero();

    for (label, keywords) in EMOTION_KEYWORDS {
        let hits = keywords
            .iter()
            .filter(|keyword| text_lower.contains(*keyword))
            .count();
        if hits > 0 {
            let current = scores.get(label).unwrap_or(0.0);
            scores.insert(*label, current + hits as f64 * KEYWORD_INCREMENT);
        }
    }

    let total = scores.total();
    if total > 0.0 {
        scores = scores
            .iter()
            .map(|(label, score)| (label.to_string(), score / total))
            .collect();
    }
    scores
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Keep the first `budget` whitespace tokens
fn truncate_tokens(text: &str, budget: usize) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() <= budget {
        return text.to_string();
    }
    tokens[..budget].join(" ")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::emotion_model::ModelError;
    use crate::EMOTION_LABELS;
    use async_trait::async_trait;

    struct FixedModel([f64; 11]);

    #[async_trait]
    impl EmotionModel for FixedModel {
        async fn logits(&self, _text: &str) -> Result<[f64; 11], ModelError> {
            Ok(self.0)
        }
    }

    struct BrokenModel;

    #[async_trait]
    impl EmotionModel for BrokenModel {
        async fn logits(&self, _text: &str) -> Result<[f64; 11], ModelError> {
            Err(ModelError::Status(503))
        }
    }

    fn assert_fixed_labels(scores: &EmotionScores) {
        let labels: Vec<&str> = scores.labels().collect();
        assert_eq!(labels, EMOTION_LABELS.to_vec());
        assert!(scores.iter().all(|(_, s)| s >= 0.0));
    }

    #[test]
    fn test_no_keywords_all_zero() {
        let scores = detect_with_keywords("The sky is blue.");
        assert_fixed_labels(&scores);
        assert_eq!(scores.total(), 0.0);
    }

    #[test]
    fn test_single_label_normalizes_to_one() {
        let scores = detect_with_keywords("I am so HAPPY today");
        assert_fixed_labels(&scores);
        assert!((scores.get("joy").unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_hits_accumulate_per_label() {
        // joy: happy + wonderful (0.6), fear: worried (0.3)
        let scores = detect_with_keywords("happy and wonderful but worried");
        assert!((scores.get("joy").unwrap() - 2.0 / 3.0).abs() < 1e-9);
        assert!((scores.get("fear").unwrap() - 1.0 / 3.0).abs() < 1e-9);
        assert!((scores.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_keyword_shared_by_two_labels() {
        let scores = detect_with_keywords("excited");
        assert!((scores.get("joy").unwrap() - 0.5).abs() < 1e-9);
        assert!((scores.get("anticipation").unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_substring_matching() {
        // "sad" inside "crusade", "down" inside "downtown"
        let scores = detect_with_keywords("crusade downtown");
        assert!((scores.get("sadness").unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_multiword_keyword() {
        let scores = detect_with_keywords("Looking forward to the weekend");
        assert!((scores.get("anticipation").unwrap() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_without_model_uses_keywords() {
        let detector = EmotionDetector::new();
        let scores = detector.detect_emotions("I feel sad").await;
        assert_eq!(detector.dominant_emotion(&scores), "sadness");
    }

    #[tokio::test]
    async fn test_model_scores_are_sigmoid() {
        let mut logits = [0.0; 11];
        logits[4] = 10.0; // joy
        logits[3] = -10.0; // fear
        let detector = EmotionDetector::with_model(Arc::new(FixedModel(logits)));
        let scores = detector.detect_emotions("whatever").await;

        assert_fixed_labels(&scores);
        assert!(scores.get("joy").unwrap() > 0.99);
        assert!(scores.get("fear").unwrap() < 0.01);
        assert!((scores.get("anger").unwrap() - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_blank_text_skips_model() {
        let detector = EmotionDetector::with_model(Arc::new(FixedModel([5.0; 11])));
        let scores = detector.detect_emotions("   ").await;
        assert_eq!(scores.total(), 0.0);
    }

    #[tokio::test]
    async fn test_model_failure_falls_back() {
        let detector = EmotionDetector::with_model(Arc::new(BrokenModel));
        let scores = detector.detect_emotions("so angry").await;
        assert!((scores.get("anger").unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_truncate_tokens() {
        assert_eq!(truncate_tokens("a b c", 5), "a b c");
        assert_eq!(truncate_tokens("a  b c d", 2), "a b");
    }
}
