//! Emotion-score mapping shared by mood entries and chat messages

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EMOTION_LABELS, NEUTRAL_EMOTION};

/// Mapping from emotion label to a non-negative score.
///
/// Backed by a sorted map: iteration order is the canonical label order for
/// the fixed label set, and alphabetical for any legacy label outside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionScores(BTreeMap<String, f64>);

impl EmotionScores {
    /// Empty mapping
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// All fixed labels at 0.0
    pub fn zero() -> Self {
        Self(
            EMOTION_LABELS
                .iter()
                .map(|label| (label.to_string(), 0.0))
                .collect(),
        )
    }

    /// Build from fixed-label scores given in canonical order
    pub fn from_canonical(values: [f64; 11]) -> Self {
        Self(
            EMOTION_LABELS
                .iter()
                .zip(values)
                .map(|(label, value)| (label.to_string(), value))
                .collect(),
        )
    }

    /// Set a label's score
    pub fn insert(&mut self, label: impl Into<String>, score: f64) {
        self.0.insert(label.into(), score);
    }

    /// Score for a label, if present
    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    /// Labels and scores in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Labels in canonical order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all scores
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Add every score of `other` into this mapping
    pub fn accumulate(&mut self, other: &EmotionScores) {
        for (label, score) in other.iter() {
            *self.0.entry(label.to_string()).or_insert(0.0) += score;
        }
    }

    /// Label with the highest score.
    ///
    /// Ties go to the first label in canonical order. An empty mapping
    /// yields `"neutral"`; an all-zero mapping still yields its first label.
    pub fn dominant(&self) -> String {
        let mut best: Option<(&str, f64)> = None;
        for (label, score) in self.iter() {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((label, score)),
            }
        }
        best.map(|(label, _)| label.to_string())
            .unwrap_or_else(|| NEUTRAL_EMOTION.to_string())
    }

    /// Up to `n` labels by descending score; equal scores keep canonical order
    pub fn top(&self, n: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .iter()
            .map(|(label, score)| (label.to_string(), score))
            .collect();
        // sort_by is stable, so ties stay in canonical order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// Read the stored JSON column, whatever shape older rows used.
    ///
    /// - object: label → score, non-numeric values dropped
    /// - array of strings: each label scores 1.0 per occurrence
    /// - string: that label with 1.0
    /// - anything else: empty
    pub fn from_legacy_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        let mut scores = Self::new();
        match value {
            Value::Object(map) => {
                for (label, score) in map {
                    if let Some(score) = score.as_f64() {
                        scores.insert(label.clone(), score);
                    }
                }
            }
            Value::Array(items) => {
                for label in items.iter().filter_map(Value::as_str) {
                    *scores.0.entry(label.to_string()).or_insert(0.0) += 1.0;
                }
            }
            Value::String(label) if !label.is_empty() => {
                scores.insert(label.clone(), 1.0);
            }
            _ => {}
        }
        scores
    }
}

impl FromIterator<(String, f64)> for EmotionScores {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_order_is_sorted() {
        let mut sorted = EMOTION_LABELS;
        sorted.sort();
        assert_eq!(sorted, EMOTION_LABELS);
    }

    #[test]
    fn test_dominant_empty_is_neutral() {
        assert_eq!(EmotionScores::new().dominant(), "neutral");
    }

    #[test]
    fn test_dominant_picks_max() {
        let scores: EmotionScores = [("joy".to_string(), 0.9), ("fear".to_string(), 0.1)]
            .into_iter()
            .collect();
        assert_eq!(scores.dominant(), "joy");
    }

    #[test]
    fn test_dominant_tie_goes_to_first_canonical() {
        let mut scores = EmotionScores::zero();
        scores.insert("sadness", 0.5);
        scores.insert("fear", 0.5);
        assert_eq!(scores.dominant(), "fear");
    }

    #[test]
    fn test_dominant_all_zero_is_first_label() {
        assert_eq!(EmotionScores::zero().dominant(), "anger");
    }

    #[test]
    fn test_top_is_stable_on_ties() {
        let mut scores = EmotionScores::zero();
        scores.insert("trust", 0.4);
        scores.insert("joy", 0.4);
        scores.insert("love", 0.1);
        let top = scores.top(3);
        assert_eq!(top[0].0, "joy");
        assert_eq!(top[1].0, "trust");
        assert_eq!(top[2].0, "love");
    }

    #[test]
    fn test_legacy_object() {
        let scores = EmotionScores::from_legacy_json(&json!({"joy": 0.9, "note": "x"}));
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get("joy"), Some(0.9));
    }

    #[test]
    fn test_legacy_list_and_string() {
        let scores = EmotionScores::from_legacy_json(&json!(["sadness", "joy", "sadness"]));
        assert_eq!(scores.get("sadness"), Some(2.0));
        assert_eq!(scores.get("joy"), Some(1.0));

        let scores = EmotionScores::from_legacy_json(&json!("anxiety"));
        assert_eq!(scores.dominant(), "anxiety");

        assert!(EmotionScores::from_legacy_json(&serde_json::Value::Null).is_empty());
    }

    #[test]
    fn test_accumulate_sums_mass() {
        let mut total = EmotionScores::new();
        total.accumulate(&EmotionScores::from_legacy_json(&json!({"joy": 0.5, "fear": 0.2})));
        total.accumulate(&EmotionScores::from_legacy_json(&json!({"fear": 0.6})));
        assert_eq!(total.get("joy"), Some(0.5));
        assert!((total.get("fear").unwrap() - 0.8).abs() < 1e-9);
    }
}
