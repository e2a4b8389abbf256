//! Location Resolution Module
//!
//! Turns the optional `lat`/`lon`/`city` request parameters into a single
//! `Location`. A city name wins over coordinates, coordinates win over the
//! configured default.

use crate::DashboardError;
use crate::config::DefaultLocationConfig;
use crate::models::Location;
use crate::upstream::UpstreamSource;
use tracing::{debug, warn};

/// What the client asked for, after applying the priority rules
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    City(String),
    Coordinates(f64, f64),
    Default,
}

impl LocationInput {
    /// Pick the input to resolve. Blank city names count as absent, and a
    /// lone latitude or longitude falls back to the default.
    #[must_use]
    pub fn from_query(lat: Option<f64>, lon: Option<f64>, city: Option<&str>) -> Self {
        if let Some(city) = city.map(str::trim).filter(|c| !c.is_empty()) {
            return Self::City(city.to_string());
        }

        match (lat, lon) {
            (Some(lat), Some(lon)) => Self::Coordinates(lat, lon),
            _ => Self::Default,
        }
    }
}

/// Service for resolving location inputs
#[derive(Debug, Clone)]
pub struct LocationResolver {
    defaults: DefaultLocationConfig,
}

impl LocationResolver {
    #[must_use]
    pub fn new(defaults: DefaultLocationConfig) -> Self {
        Self { defaults }
    }

    /// Resolve a location input into a structured Location
    pub async fn resolve_location(
        &self,
        upstream: &dyn UpstreamSource,
        location_input: LocationInput,
    ) -> Result<Location, DashboardError> {
        debug!("Resolving location input: {:?}", location_input);

        let location = match location_input {
            LocationInput::City(name) => Self::resolve_name(upstream, name).await?,
            LocationInput::Coordinates(lat, lon) => {
                Location::new(lat, lon, self.defaults.position_label.clone())
            }
            LocationInput::Default => self.defaults.to_location(),
        };

        debug!(
            "Resolved location: {} at ({})",
            location.display_name,
            location.format_coordinates()
        );

        Ok(location)
    }

    /// Resolve a city name to coordinates via geocoding
    async fn resolve_name(
        upstream: &dyn UpstreamSource,
        name: String,
    ) -> Result<Location, DashboardError> {
        debug!("Geocoding location name: {}", name);

        match upstream.geocode(&name).await {
            Ok(Some(location)) => Ok(location),
            Ok(None) => {
                debug!("No geocoding match for '{}'", name);
                Err(DashboardError::city_not_found(name))
            }
            Err(e) => {
                warn!("Geocoding '{}' failed: {:#}", name, e);
                Err(DashboardError::city_not_found(name))
            }
        }
    }
}
