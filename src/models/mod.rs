//! Data models for the `SafeBreathe` dashboard
//!
//! Every model is request-scoped and organized by concern:
//! - Location: resolved coordinates and display name
//! - Pollution, Weather, Forecast, UV, Pollen: normalized upstream readings
//! - Dashboard: the merged payload returned to clients

pub mod dashboard;
pub mod forecast;
pub mod location;
pub mod pollen;
pub mod pollution;
pub mod uv;
pub mod weather;

// Re-export all public types for convenient access
pub use dashboard::{DashboardData, DashboardResult};
pub use forecast::{ForecastEntry, MIDDAY_MARKER, is_midday, midday_entries};
pub use location::Location;
pub use pollen::PollenReading;
pub use pollution::{AirQualityStatus, PollutionReading, sport_recommendation};
pub use uv::{UvLevel, UvReading};
pub use weather::WeatherReading;
