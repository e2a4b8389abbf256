//! Error types and handling for the `SafeBreathe` dashboard

use thiserror::Error;

/// Client-facing text when a city lookup yields no match.
pub const CITY_NOT_FOUND_MESSAGE: &str = "city not found";

/// Client-facing text when pollution or current weather could not be fetched.
pub const DATA_UNAVAILABLE_MESSAGE: &str = "could not retrieve weather data";

/// Main error type for the `SafeBreathe` dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream provider errors (transport, status or payload)
    #[error("Upstream error from {provider}: {message}")]
    Upstream { provider: String, message: String },

    /// A city lookup returned no match
    #[error("City not found: {city}")]
    CityNotFound { city: String },
}

impl DashboardError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream error for the named provider
    pub fn upstream<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::Upstream {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new city-not-found error
    pub fn city_not_found<S: Into<String>>(city: S) -> Self {
        Self::CityNotFound { city: city.into() }
    }

    /// Get the message shown to dashboard clients
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            DashboardError::Upstream { .. } => DATA_UNAVAILABLE_MESSAGE.to_string(),
            DashboardError::CityNotFound { .. } => CITY_NOT_FOUND_MESSAGE.to_string(),
        }
    }
}
