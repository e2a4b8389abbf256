//! Merged dashboard payload

use super::{ForecastEntry, PollenReading, PollutionReading, UvReading, WeatherReading};
use serde::{Deserialize, Serialize};

/// All readings for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    /// Display name of the resolved location
    pub location: String,
    pub pollution: PollutionReading,
    pub weather: WeatherReading,
    pub forecast: Vec<ForecastEntry>,
    pub uv: Option<UvReading>,
    pub pollen: Option<PollenReading>,
}

/// Dashboard response body: either the data or a bare `{"error": ...}` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DashboardResult {
    Ready(DashboardData),
    Failed { error: String },
}

impl DashboardResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Failed {
            error: message.into(),
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_has_single_key() {
        let json = serde_json::to_value(DashboardResult::error("city not found")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "city not found"}));
    }
}
