//! Weekday pattern payloads

use chrono::Weekday;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Monday-first weekday order used for every weekday tie-break
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English weekday name
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Weekday-keyed values, serialized as a JSON object in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayMap<T>(Vec<(Weekday, T)>);

impl<T> WeekdayMap<T> {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, day: Weekday) -> Option<&T> {
        self.0.iter().find(|(d, _)| *d == day).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Weekday, T)> {
        self.0.iter()
    }
}

impl<T> FromIterator<(Weekday, T)> for WeekdayMap<T> {
    fn from_iter<I: IntoIterator<Item = (Weekday, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Serialize> Serialize for WeekdayMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (day, value) in &self.0 {
            map.serialize_entry(weekday_name(*day), value)?;
        }
        map.end()
    }
}

/// Count and mean rating for one weekday
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct WeekdayStats {
    pub count: usize,
    pub average: f64,
}

/// Core weekday statistics
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WeekdayPatternData {
    pub most_active_day: String,
    pub avg_daily_entries: f64,
    pub consistency_score: f64,
    pub weekday_averages: WeekdayMap<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_breakdown: Option<WeekdayMap<WeekdayStats>>,
}

/// Weekday pattern response
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WeekdayPatterns {
    pub data: WeekdayPatternData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub total_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_with_data: Option<usize>,
}
