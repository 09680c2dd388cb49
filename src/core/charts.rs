//! Chart data builders
//!
//! Rendering happens client side; these functions only shape the numbers.
//! A chart with nothing to show carries a `message` and empty series.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::core::analytics::{emotion_mass, round1};
use crate::types::{
    weekday_name, ComprehensiveReport, CorrelationChart, EmotionDistributionChart, MoodEntry,
    MoodTrendChart, TrendPoint, WeeklyHeatmapChart, WEEKDAYS,
};
use crate::EMOTION_LABELS;

/// Slices in the distribution chart
const DISTRIBUTION_SLICES: usize = 8;

/// Labels kept next to the mood rating in the correlation matrix
const CORRELATION_LABELS: usize = 6;

/// Longest heatmap in the bundled report
const REPORT_MAX_WEEKS: i64 = 12;

fn window(entries: &[MoodEntry], days: i64, now: DateTime<Utc>) -> Vec<&MoodEntry> {
    let start = now - Duration::days(days);
    let mut out: Vec<&MoodEntry> = entries
        .iter()
        .filter(|e| e.date >= start && e.date <= now)
        .collect();
    out.sort_by_key(|e| e.date);
    out
}

/// Ratings over the last `days` days, oldest first
pub fn mood_trend(entries: &[MoodEntry], days: i64, now: DateTime<Utc>) -> MoodTrendChart {
    let points: Vec<TrendPoint> = window(entries, days, now)
        .into_iter()
        .map(|e| TrendPoint {
            date: e.date,
            rating: e.mood_rating,
        })
        .collect();
    let message = points
        .is_empty()
        .then(|| "No mood data available for the selected period".to_string());

    MoodTrendChart {
        title: format!("Mood Trend - Last {} Days", days),
        days,
        points,
        message,
    }
}

/// Top labels by summed score over the last `days` days
pub fn emotion_distribution(
    entries: &[MoodEntry],
    days: i64,
    now: DateTime<Utc>,
) -> EmotionDistributionChart {
    let scored = window(entries, days, now);
    let slices: Vec<(String, f64)> = emotion_mass(scored)
        .top(DISTRIBUTION_SLICES)
        .into_iter()
        .filter(|(_, mass)| *mass > 0.0)
        .collect();
    let message = slices
        .is_empty()
        .then(|| "No emotion data available".to_string());

    EmotionDistributionChart {
        title: format!("Emotion Distribution - Last {} Days", days),
        slices,
        message,
    }
}

/// Mean rating per weekday and ISO week over the last `weeks` weeks
pub fn weekly_heatmap(entries: &[MoodEntry], weeks: i64, now: DateTime<Utc>) -> WeeklyHeatmapChart {
    let title = format!("Weekly Mood Heatmap - Last {} Weeks", weeks);
    let weekdays: Vec<&'static str> = WEEKDAYS.iter().map(|d| weekday_name(*d)).collect();

    let scoped = window(entries, weeks * 7, now);
    if scoped.is_empty() {
        return WeeklyHeatmapChart {
            title,
            weekdays,
            weeks: Vec::new(),
            cells: vec![Vec::new(); WEEKDAYS.len()],
            message: Some("No mood data available for heatmap".to_string()),
        };
    }

    // (iso year, iso week) keeps columns ordered across a year boundary
    let mut sums: BTreeMap<(i32, u32), [(i64, usize); 7]> = BTreeMap::new();
    for entry in scoped {
        let iso = entry.date.iso_week();
        let row = entry.date.weekday().num_days_from_monday() as usize;
        let column = sums.entry((iso.year(), iso.week())).or_insert([(0, 0); 7]);
        column[row].0 += entry.mood_rating;
        column[row].1 += 1;
    }

    let columns: Vec<&[(i64, usize); 7]> = sums.values().collect();
    let cells: Vec<Vec<Option<f64>>> = (0..WEEKDAYS.len())
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    let (sum, count) = column[row];
                    (count > 0).then(|| round1(sum as f64 / count as f64))
                })
                .collect()
        })
        .collect();

    WeeklyHeatmapChart {
        title,
        weekdays,
        weeks: sums.keys().map(|(_, week)| *week).collect(),
        cells,
        message: None,
    }
}

/// Pearson correlation of mood rating against the most variable labels.
///
/// A label missing from an entry counts as 0. Undefined coefficients
/// (a constant column) are reported as 0.
pub fn mood_emotion_correlation(
    entries: &[MoodEntry],
    days: i64,
    now: DateTime<Utc>,
) -> CorrelationChart {
    let title = "Mood-Emotion Correlation Matrix".to_string();
    let scored: Vec<&MoodEntry> = window(entries, days, now)
        .into_iter()
        .filter(|e| !e.detected_emotions.is_empty())
        .collect();

    if scored.is_empty() {
        return CorrelationChart {
            title,
            columns: Vec::new(),
            matrix: Vec::new(),
            message: Some("No data available for correlation analysis".to_string()),
        };
    }

    // every label seen, fixed labels first
    let mut labels: Vec<String> = EMOTION_LABELS.iter().map(|l| l.to_string()).collect();
    for entry in &scored {
        for label in entry.detected_emotions.labels() {
            if !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
    }
    labels.retain(|label| {
        scored
            .iter()
            .any(|e| e.detected_emotions.get(label).is_some())
    });

    let column_of = |label: &str| -> Vec<f64> {
        scored
            .iter()
            .map(|e| e.detected_emotions.get(label).unwrap_or(0.0))
            .collect()
    };

    let mut ranked: Vec<(String, f64)> = labels
        .into_iter()
        .map(|label| {
            let var = variance(&column_of(&label));
            (label, var)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(CORRELATION_LABELS);

    let mut columns = vec!["mood_rating".to_string()];
    let mut series = vec![scored.iter().map(|e| e.mood_rating as f64).collect::<Vec<f64>>()];
    for (label, _) in ranked {
        series.push(column_of(&label));
        columns.push(label);
    }

    let matrix: Vec<Vec<f64>> = series
        .iter()
        .map(|a| series.iter().map(|b| pearson(a, b)).collect())
        .collect();

    CorrelationChart {
        title,
        columns,
        matrix,
        message: None,
    }
}

/// All four charts; the heatmap spans `min(days / 7, 12)` weeks
pub fn comprehensive_report(
    entries: &[MoodEntry],
    days: i64,
    now: DateTime<Utc>,
) -> ComprehensiveReport {
    ComprehensiveReport {
        mood_trend: mood_trend(entries, days, now),
        emotion_distribution: emotion_distribution(entries, days, now),
        weekly_heatmap: weekly_heatmap(entries, (days / 7).min(REPORT_MAX_WEEKS), now),
        mood_emotion_correlation: mood_emotion_correlation(entries, days, now),
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn variance(xs: &[f64]) -> f64 {
    let m = mean(xs);
    mean(&xs.iter().map(|x| (x - m).powi(2)).collect::<Vec<f64>>())
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let (ma, mb) = (mean(a), mean(b));
    let mut cov = 0.0;
    let mut va = 0.0;
    let mut vb = 0.0;
    for (x, y) in a.iter().zip(b) {
        cov += (x - ma) * (y - mb);
        va += (x - ma).powi(2);
        vb += (y - mb).powi(2);
    }
    let denom = (va * vb).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    round2(cov / denom)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

// =============================================================================
// TESTS
// =============================================================================
