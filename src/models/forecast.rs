//! Daily forecast entries and the midday filter

use serde::{Deserialize, Serialize};

/// Substring marking the local-noon sample in a provider timestamp
pub const MIDDAY_MARKER: &str = "12:00:00";

/// One representative forecast sample per day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Provider-formatted timestamp, e.g. `2024-05-02 12:00:00`
    pub date: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    pub icon: String,
    pub wind_speed: f64,
}

/// Anything carrying a provider timestamp string
pub trait Timestamped {
    fn timestamp(&self) -> &str;
}

impl Timestamped for ForecastEntry {
    fn timestamp(&self) -> &str {
        &self.date
    }
}

/// Whether a provider timestamp denotes the midday sample
#[must_use]
pub fn is_midday(timestamp: &str) -> bool {
    timestamp.contains(MIDDAY_MARKER)
}

/// Lazily keep the midday samples, preserving their order
pub fn midday_entries<I>(entries: I) -> impl Iterator<Item = I::Item>
where
    I: IntoIterator,
    I::Item: Timestamped,
{
    entries
        .into_iter()
        .filter(|entry| is_midday(entry.timestamp()))
}
