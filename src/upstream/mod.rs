//! Upstream provider clients
//!
//! OpenWeatherMap serves geocoding, air pollution, current weather and the
//! 3-hourly forecast; Open-Meteo serves UV and pollen. Every call returns a
//! `Result` so the aggregator can log the cause before collapsing a failure.

use crate::DashboardError;
use crate::config::ProvidersConfig;
use crate::models::{
    ForecastEntry, Location, PollenReading, PollutionReading, UvReading, WeatherReading,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

pub mod open_meteo;
pub mod openweather;

const USER_AGENT: &str = concat!("SafeBreathe/", env!("CARGO_PKG_VERSION"));
const SLOW_RESPONSE: Duration = Duration::from_secs(5);
const MAX_ERROR_BODY: usize = 200;

/// Source of every external reading the dashboard needs
#[async_trait]
pub trait UpstreamSource: Send + Sync {
    /// First geocoding match for a city name, `None` when nothing matches
    async fn geocode(&self, city: &str) -> Result<Option<Location>>;

    async fn air_pollution(&self, lat: f64, lon: f64) -> Result<PollutionReading>;

    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherReading>;

    /// Midday samples of the multi-day forecast
    async fn forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastEntry>>;

    async fn uv_index(&self, lat: f64, lon: f64) -> Result<UvReading>;

    async fn pollen(&self, lat: f64, lon: f64) -> Result<PollenReading>;
}

/// `UpstreamSource` backed by the real HTTP APIs
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    config: ProvidersConfig,
}

impl HttpUpstream {
    /// Create a new upstream client
    pub fn new(config: ProvidersConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        if config.api_key.is_none() {
            warn!(
                "No OpenWeatherMap API key configured; \
                 geocoding, weather and pollution calls will be rejected"
            );
        }

        Ok(Self { client, config })
    }

    fn api_key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }

    fn openweather_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.openweather_base_url.trim_end_matches('/'))
    }

    /// Query parameters shared by the keyed OpenWeatherMap data endpoints
    fn openweather_query(
        &self,
        lat: f64,
        lon: f64,
        localized: bool,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("appid", self.api_key().to_string()),
        ];
        if localized {
            query.push(("units", self.config.units.clone()));
            query.push(("lang", self.config.lang.clone()));
        }
        query
    }

    /// GET a JSON document, turning transport, status and parse failures into errors
    async fn get_json<T: DeserializeOwned>(
        &self,
        provider: &'static str,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let start_time = Instant::now();
        debug!(provider, url, "Sending upstream request");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {provider}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read {provider} response body"))?;

        let elapsed = start_time.elapsed();
        if elapsed > SLOW_RESPONSE {
            warn!(provider, "Slow upstream response: {:.3}s", elapsed.as_secs_f64());
        }

        if !status.is_success() {
            return Err(DashboardError::upstream(
                provider,
                format!("status {status}: {}", truncate_body(&body)),
            )
            .into());
        }

        let parsed = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse {provider} JSON"))?;

        info!(provider, "Upstream request succeeded in {:.3}s", elapsed.as_secs_f64());
        Ok(parsed)
    }
}

#[async_trait]
impl UpstreamSource for HttpUpstream {
    #[instrument(skip(self))]
    async fn geocode(&self, city: &str) -> Result<Option<Location>> {
        let query = [
            ("q", city.to_string()),
            ("limit", "1".to_string()),
            ("appid", self.api_key().to_string()),
        ];
        let matches: Vec<openweather::GeocodingMatch> = self
            .get_json("geocoding", &self.openweather_url("/geo/1.0/direct"), &query)
            .await?;

        Ok(matches.into_iter().next().map(Location::from))
    }

    #[instrument(skip(self))]
    async fn air_pollution(&self, lat: f64, lon: f64) -> Result<PollutionReading> {
        let response: openweather::AirPollutionResponse = self
            .get_json(
                "air_pollution",
                &self.openweather_url("/data/2.5/air_pollution"),
                &self.openweather_query(lat, lon, false),
            )
            .await?;

        PollutionReading::try_from(response)
    }

    #[instrument(skip(self))]
    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherReading> {
        let response: openweather::CurrentWeatherResponse = self
            .get_json(
                "weather",
                &self.openweather_url("/data/2.5/weather"),
                &self.openweather_query(lat, lon, true),
            )
            .await?;

        WeatherReading::try_from(response)
    }

    #[instrument(skip(self))]
    async fn forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastEntry>> {
        let response: openweather::ForecastResponse = self
            .get_json(
                "forecast",
                &self.openweather_url("/data/2.5/forecast"),
                &self.openweather_query(lat, lon, true),
            )
            .await?;

        response.into_midday_entries()
    }

    #[instrument(skip(self))]
    async fn uv_index(&self, lat: f64, lon: f64) -> Result<UvReading> {
        let url = format!(
            "{}/v1/forecast",
            self.config.open_meteo_base_url.trim_end_matches('/')
        );
        let response: open_meteo::UvResponse = self
            .get_json("uv", &url, &open_meteo::query(lat, lon, open_meteo::UV_FIELDS))
            .await?;

        Ok(response.into())
    }

    #[instrument(skip(self))]
    async fn pollen(&self, lat: f64, lon: f64) -> Result<PollenReading> {
        let url = format!(
            "{}/v1/air-quality",
            self.config.air_quality_base_url.trim_end_matches('/')
        );
        let response: open_meteo::PollenResponse = self
            .get_json("pollen", &url, &open_meteo::query(lat, lon, open_meteo::POLLEN_FIELDS))
            .await?;

        Ok(response.into())
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= MAX_ERROR_BODY + 3);

        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn test_openweather_query_localization() {
        let config = ProvidersConfig {
            api_key: Some("secret".to_string()),
            ..ProvidersConfig::default()
        };
        let upstream = HttpUpstream::new(config).unwrap();

        let plain = upstream.openweather_query(48.5, 7.7, false);
        assert_eq!(plain.len(), 3);
        assert!(plain.contains(&("appid", "secret".to_string())));

        let localized = upstream.openweather_query(48.5, 7.7, true);
        assert!(localized.contains(&("units", "metric".to_string())));
        assert!(localized.contains(&("lang", "fr".to_string())));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ProvidersConfig {
            openweather_base_url: "http://localhost:1234/".to_string(),
            ..ProvidersConfig::default()
        };
        let upstream = HttpUpstream::new(config).unwrap();
        assert_eq!(
            upstream.openweather_url("/data/2.5/weather"),
            "http://localhost:1234/data/2.5/weather"
        );
    }
}
