//! Output structures for terminal display

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::types::{EmotionScores, MoodBand, SelfHelpPlan};

/// Result of classifying one text from the CLI
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationOutput {
    pub timestamp: DateTime<Utc>,
    pub dominant_emotion: String,
    pub detected_emotions: EmotionScores,
    /// Present when a rating was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<MoodBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<SelfHelpPlan>,
}

impl ClassificationOutput {
    pub fn new(detected_emotions: EmotionScores) -> Self {
        Self {
            timestamp: Utc::now(),
            dominant_emotion: detected_emotions.dominant(),
            detected_emotions,
            band: None,
            recommendations: None,
        }
    }

    /// Attach the plan built for `rating`
    pub fn with_plan(mut self, rating: i64, plan: SelfHelpPlan) -> Self {
        self.band = Some(MoodBand::from_rating(rating));
        self.recommendations = Some(plan);
        self
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let mut out = format!("emotion={}", self.dominant_emotion.bold());
        for (label, score) in self.detected_emotions.top(3) {
            if score > 0.0 {
                out.push_str(&format!(" | {}={:.2}", label, score));
            }
        }
        if let (Some(band), Some(plan)) = (self.band, &self.recommendations) {
            let line = format!(
                "\n{} mood={} | plan={} | {} min",
                band.emoji(),
                band,
                plan.activity_names().join(", "),
                plan.duration_minutes
            );
            out.push_str(&line.color(band.color()).to_string());
            for affirmation in &plan.affirmations {
                out.push_str(&format!("\n  {}", affirmation.italic()));
            }
        }
        out
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        let scores: Vec<String> = self
            .detected_emotions
            .iter()
            .map(|(label, score)| format!("{}={:.3}", label, score))
            .collect();
        let mut out = format!("dominant={} | {}", self.dominant_emotion, scores.join(" "));
        if let (Some(band), Some(plan)) = (self.band, &self.recommendations) {
            out.push_str(&format!(
                " | band={} | plan={} | minutes={}",
                band,
                plan.activity_names().join(","),
                plan.duration_minutes
            ));
        }
        out
    }
}
