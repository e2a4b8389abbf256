//! `SafeBreathe` - air quality and weather dashboard backend
//!
//! This library resolves a location, pulls air pollution, weather, forecast,
//! UV and pollen readings from OpenWeatherMap and Open-Meteo, and serves the
//! merged result over a single JSON endpoint.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod upstream;
pub mod web;

// Re-export core types for public API
pub use aggregator::Aggregator;
pub use config::DashboardConfig;
pub use error::DashboardError;
pub use location_resolver::{LocationInput, LocationResolver};
pub use models::{DashboardData, DashboardResult, Location};
pub use upstream::{HttpUpstream, UpstreamSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
