//! Current weather reading

use serde::{Deserialize, Serialize};

/// Current conditions at the resolved location, temperatures in °C
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Localized condition text from the provider
    pub description: String,
    /// Opaque provider icon code
    pub icon: String,
    pub wind_speed: f64,
}
