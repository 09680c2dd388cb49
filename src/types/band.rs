//! Mood band definitions

use colored::Color;
use serde::{Deserialize, Serialize};

use crate::{LOW_MOOD_MAX, MEDIUM_MOOD_MAX};

/// The three rating bands the recommender plans for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodBand {
    /// 1-4: grounding and breathing
    Low,
    /// 5-7: breathing plus a cognitive exercise
    Medium,
    /// 8-10: maintenance and gratitude
    High,
}

impl MoodBand {
    /// Band for a rating; boundaries are inclusive
    pub fn from_rating(rating: i64) -> Self {
        if rating <= LOW_MOOD_MAX {
            MoodBand::Low
        } else if rating <= MEDIUM_MOOD_MAX {
            MoodBand::Medium
        } else {
            MoodBand::High
        }
    }

    /// Terminal color for this band
    pub fn color(&self) -> Color {
        match self {
            MoodBand::Low => Color::Red,
            MoodBand::Medium => Color::Yellow,
            MoodBand::High => Color::Green,
        }
    }

    /// Get emoji for band
    pub fn emoji(&self) -> &'static str {
        match self {
            MoodBand::Low => "🌧",
            MoodBand::Medium => "⛅",
            MoodBand::High => "☀",
        }
    }
}

impl std::fmt::Display for MoodBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MoodBand::Low => "LOW",
            MoodBand::Medium => "MEDIUM",
            MoodBand::High => "HIGH",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(MoodBand::from_rating(1), MoodBand::Low);
        assert_eq!(MoodBand::from_rating(4), MoodBand::Low);
        assert_eq!(MoodBand::from_rating(5), MoodBand::Medium);
        assert_eq!(MoodBand::from_rating(7), MoodBand::Medium);
        assert_eq!(MoodBand::from_rating(8), MoodBand::High);
        assert_eq!(MoodBand::from_rating(10), MoodBand::High);
    }
}
