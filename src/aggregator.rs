//! Dashboard aggregation
//!
//! Fetches every reading for a resolved location, one upstream call after the
//! other. Each call is isolated: its error is logged and collapsed to `None`
//! (or an empty forecast) so the remaining calls still run.

use crate::error::DATA_UNAVAILABLE_MESSAGE;
use crate::location_resolver::{LocationInput, LocationResolver};
use crate::models::{
    DashboardData, DashboardResult, ForecastEntry, Location, PollenReading, PollutionReading,
    UvReading, WeatherReading,
};
use crate::upstream::UpstreamSource;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Resolves locations and merges upstream readings into a dashboard
#[derive(Clone)]
pub struct Aggregator {
    upstream: Arc<dyn UpstreamSource>,
    resolver: LocationResolver,
}

/// Log a failed fetch and drop its reason
fn collapse<T>(provider: &'static str, result: anyhow::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(provider, "Upstream fetch failed: {:#}", e);
            None
        }
    }
}

impl Aggregator {
    pub fn new(upstream: Arc<dyn UpstreamSource>, resolver: LocationResolver) -> Self {
        Self { upstream, resolver }
    }

    /// Resolve the requested location, then aggregate its readings.
    ///
    /// An unknown city ends the request before any data is fetched.
    #[instrument(skip(self))]
    pub async fn dashboard(&self, input: LocationInput) -> DashboardResult {
        match self
            .resolver
            .resolve_location(self.upstream.as_ref(), input)
            .await
        {
            Ok(location) => self.aggregate(&location).await,
            Err(e) => {
                info!("Location resolution failed: {}", e);
                DashboardResult::error(e.user_message())
            }
        }
    }

    /// Fetch and merge all readings for a location
    pub async fn aggregate(&self, location: &Location) -> DashboardResult {
        let (lat, lon) = (location.latitude, location.longitude);

        let pollution = self.fetch_pollution(lat, lon).await;
        let weather = self.fetch_weather(lat, lon).await;
        let forecast = self.fetch_forecast(lat, lon).await;
        let uv = self.fetch_uv(lat, lon).await;
        let pollen = self.fetch_pollen(lat, lon).await;

        let (Some(pollution), Some(weather)) = (pollution, weather) else {
            warn!(
                location = %location.display_name,
                "Pollution or weather unavailable, returning error body"
            );
            return DashboardResult::error(DATA_UNAVAILABLE_MESSAGE);
        };

        debug!(
            aqi = pollution.aqi_score,
            forecast_days = forecast.len(),
            pollen_peak = pollen.as_ref().map(PollenReading::peak),
            "Dashboard assembled for {}",
            location.display_name
        );

        DashboardResult::Ready(DashboardData {
            location: location.display_name.clone(),
            pollution,
            weather,
            forecast,
            uv,
            pollen,
        })
    }

    pub async fn fetch_pollution(&self, lat: f64, lon: f64) -> Option<PollutionReading> {
        collapse("air_pollution", self.upstream.air_pollution(lat, lon).await)
    }

    pub async fn fetch_weather(&self, lat: f64, lon: f64) -> Option<WeatherReading> {
        collapse("weather", self.upstream.current_weather(lat, lon).await)
    }

    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Vec<ForecastEntry> {
        collapse("forecast", self.upstream.forecast(lat, lon).await).unwrap_or_default()
    }

    pub async fn fetch_uv(&self, lat: f64, lon: f64) -> Option<UvReading> {
        collapse("uv", self.upstream.uv_index(lat, lon).await)
    }

    pub async fn fetch_pollen(&self, lat: f64, lon: f64) -> Option<PollenReading> {
        collapse("pollen", self.upstream.pollen(lat, lon).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultLocationConfig;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Upstream stub with a switch per provider and a call log
    #[derive(Default)]
    struct Stub {
        pollution_down: bool,
        weather_down: bool,
        forecast_down: bool,
        uv_down: bool,
        pollen_down: bool,
        known_city: Option<Location>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl Stub {
        fn record(&self, call: &'static str, down: bool) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if down {
                Err(anyhow!("{call} unavailable"))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn weather() -> WeatherReading {
        WeatherReading {
            temperature: 21.0,
            feels_like: 20.5,
            temp_min: 18.0,
            temp_max: 24.0,
            description: "ciel dégagé".to_string(),
            icon: "01d".to_string(),
            wind_speed: 2.5,
        }
    }

    fn midday(date: &str) -> ForecastEntry {
        ForecastEntry {
            date: date.to_string(),
            temperature: 22.0,
            feels_like: 21.0,
            description: "nuageux".to_string(),
            icon: "03d".to_string(),
            wind_speed: 3.0,
        }
    }

    #[async_trait]
    impl UpstreamSource for Stub {
        async fn geocode(&self, _city: &str) -> Result<Option<Location>> {
            self.record("geocode", false)?;
            Ok(self.known_city.clone())
        }
        async fn air_pollution(&self, _: f64, _: f64) -> Result<PollutionReading> {
            self.record("air_pollution", self.pollution_down)?;
            Ok(PollutionReading::new(2, BTreeMap::from([("pm10".to_string(), 12.0)])))
        }
        async fn current_weather(&self, _: f64, _: f64) -> Result<WeatherReading> {
            self.record("weather", self.weather_down)?;
            Ok(weather())
        }
        async fn forecast(&self, _: f64, _: f64) -> Result<Vec<ForecastEntry>> {
            self.record("forecast", self.forecast_down)?;
            Ok(vec![midday("2024-05-02 12:00:00")])
        }
        async fn uv_index(&self, _: f64, _: f64) -> Result<UvReading> {
            self.record("uv", self.uv_down)?;
            Ok(UvReading::new(4.0, 5.0))
        }
        async fn pollen(&self, _: f64, _: f64) -> Result<PollenReading> {
            self.record("pollen", self.pollen_down)?;
            Ok(PollenReading {
                alder: 0.0,
                birch: 3.0,
                grass: 9.0,
                mugwort: 0.0,
                olive: 0.0,
                ragweed: 0.0,
            })
        }
    }

    fn aggregator(stub: Arc<Stub>) -> Aggregator {
        Aggregator::new(stub, LocationResolver::new(DefaultLocationConfig::default()))
    }

    #[tokio::test]
    async fn test_all_sources_available() {
        let stub = Arc::new(Stub::default());
        let result = aggregator(stub.clone()).dashboard(LocationInput::Default).await;

        let DashboardResult::Ready(data) = result else {
            panic!("expected data, got {result:?}");
        };
        assert_eq!(data.location, "Strasbourg");
        assert_eq!(data.pollution.aqi_score, 2);
        assert_eq!(data.weather, weather());
        assert_eq!(data.forecast.len(), 1);
        assert!(data.uv.is_some());
        assert!(data.pollen.is_some());
        assert_eq!(
            stub.calls(),
            vec!["air_pollution", "weather", "forecast", "uv", "pollen"]
        );
    }

    #[tokio::test]
    async fn test_missing_pollution_is_an_error() {
        let stub = Arc::new(Stub {
            pollution_down: true,
            ..Stub::default()
        });
        let result = aggregator(stub.clone()).dashboard(LocationInput::Default).await;

        assert_eq!(result, DashboardResult::error("could not retrieve weather data"));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"error": "could not retrieve weather data"})
        );
        // the other fetches are still attempted
        assert_eq!(stub.calls().len(), 5);
    }

    #[tokio::test]
    async fn test_missing_weather_is_an_error() {
        let stub = Arc::new(Stub {
            weather_down: true,
            ..Stub::default()
        });
        let result = aggregator(stub).dashboard(LocationInput::Coordinates(1.0, 2.0)).await;
        assert!(!result.is_ready());
    }

    #[tokio::test]
    async fn test_optional_sources_degrade() {
        let stub = Arc::new(Stub {
            forecast_down: true,
            uv_down: true,
            pollen_down: true,
            ..Stub::default()
        });
        let result = aggregator(stub).dashboard(LocationInput::Default).await;

        let DashboardResult::Ready(data) = result else {
            panic!("expected data, got {result:?}");
        };
        assert!(data.forecast.is_empty());
        assert!(data.uv.is_none());
        assert!(data.pollen.is_none());
        assert_eq!(data.weather, weather());

        let json = serde_json::to_value(&data).unwrap();
        assert!(json["uv"].is_null());
        assert!(json["pollen"].is_null());
        assert_eq!(json["forecast"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unknown_city_short_circuits() {
        let stub = Arc::new(Stub::default());
        let result = aggregator(stub.clone())
            .dashboard(LocationInput::City("Atlantis".to_string()))
            .await;

        assert_eq!(result, DashboardResult::error("city not found"));
        assert_eq!(stub.calls(), vec!["geocode"]);
    }

    #[tokio::test]
    async fn test_city_location_name() {
        let stub = Arc::new(Stub {
            known_city: Some(Location::new(43.6, 1.44, "Toulouse")),
            ..Stub::default()
        });
        let result = aggregator(stub).dashboard(LocationInput::City("toulouse".to_string())).await;

        let DashboardResult::Ready(data) = result else {
            panic!("expected data, got {result:?}");
        };
        assert_eq!(data.location, "Toulouse");
    }
}
