//! Air pollution reading and its AQI classification tables

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Qualitative label for the provider's 1..=5 air quality index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirQualityStatus {
    Excellent,
    Good,
    Moderate,
    Bad,
    #[serde(rename = "Very Bad")]
    VeryBad,
    Unknown,
}

impl AirQualityStatus {
    /// Classify an AQI score; anything outside 1..=5 is `Unknown`
    #[must_use]
    pub fn from_aqi(aqi: i64) -> Self {
        match aqi {
            1 => Self::Excellent,
            2 => Self::Good,
            3 => Self::Moderate,
            4 => Self::Bad,
            5 => Self::VeryBad,
            _ => Self::Unknown,
        }
    }
}

/// Outdoor sport advice for an AQI score.
///
/// Scores at or below 2 are fine, 3 is borderline and everything from 4 up
/// (including out-of-range values) means staying inside.
#[must_use]
pub fn sport_recommendation(aqi: i64) -> &'static str {
    match aqi {
        i64::MIN..=2 => "ideal conditions",
        3 => "acceptable, avoid intense effort",
        _ => "stay indoors",
    }
}

/// Normalized air pollution reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionReading {
    pub aqi_score: i64,
    pub status: AirQualityStatus,
    pub recommendation: String,
    /// Pollutant concentrations in µg/m³, keyed by provider component name
    pub details: BTreeMap<String, f64>,
}

impl PollutionReading {
    #[must_use]
    pub fn new(aqi_score: i64, details: BTreeMap<String, f64>) -> Self {
        Self {
            aqi_score,
            status: AirQualityStatus::from_aqi(aqi_score),
            recommendation: sport_recommendation(aqi_score).to_string(),
            details,
        }
    }
}
