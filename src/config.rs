//! Configuration management for the `SafeBreathe` dashboard
//!
//! Settings come from built-in defaults, an optional TOML file and `SAFEBREATHE_`
//! environment variables, in that order of precedence. The legacy
//! `OPENWEATHER_API_KEY` variable still supplies the provider key.

use crate::DashboardError;
use crate::models::Location;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the OpenWeatherMap key in older deployments.
pub const LEGACY_API_KEY_VAR: &str = "OPENWEATHER_API_KEY";

const ENV_PREFIX: &str = "SAFEBREATHE";

/// Root configuration structure for the dashboard service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream provider settings
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Location served when the client gives neither a city nor coordinates
    #[serde(default)]
    pub default_location: DefaultLocationConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whole-request budget, upstream calls included
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
}

/// Upstream provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// OpenWeatherMap API key, shared by geocoding, weather and air pollution
    pub api_key: Option<String>,
    #[serde(default = "default_openweather_base_url")]
    pub openweather_base_url: String,
    #[serde(default = "default_open_meteo_base_url")]
    pub open_meteo_base_url: String,
    #[serde(default = "default_air_quality_base_url")]
    pub air_quality_base_url: String,
    #[serde(default = "default_units")]
    pub units: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Per-call timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Fallback location and the label used for caller-supplied coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultLocationConfig {
    #[serde(default = "default_location_name")]
    pub name: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_position_label")]
    pub position_label: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u32 {
    30
}

fn default_openweather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_open_meteo_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_air_quality_base_url() -> String {
    "https://air-quality-api.open-meteo.com".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_lang() -> String {
    "fr".to_string()
}

fn default_provider_timeout() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_location_name() -> String {
    "Strasbourg".to_string()
}

fn default_latitude() -> f64 {
    48.5734
}

fn default_longitude() -> f64 {
    7.7521
}

fn default_position_label() -> String {
    "current position".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            openweather_base_url: default_openweather_base_url(),
            open_meteo_base_url: default_open_meteo_base_url(),
            air_quality_base_url: default_air_quality_base_url(),
            units: default_units(),
            lang: default_lang(),
            timeout_seconds: default_provider_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultLocationConfig {
    fn default() -> Self {
        Self {
            name: default_location_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            position_label: default_position_label(),
        }
    }
}

impl DefaultLocationConfig {
    /// The configured fallback as a resolved location
    #[must_use]
    pub fn to_location(&self) -> Location {
        Location::new(self.latitude, self.longitude, self.name.clone())
    }
}

impl DashboardConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path.
    ///
    /// An explicit path must exist; without one the per-user config file and then
    /// `./config.toml` are used when present.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = match config_path {
            Some(path) if !path.exists() => {
                return Err(DashboardError::config(format!(
                    "Config file not found: {}",
                    path.display()
                ))
                .into());
            }
            Some(path) => Some(path),
            None => Self::get_config_path()
                .filter(|path| path.exists())
                .or_else(|| Some(PathBuf::from("config.toml")).filter(|path| path.exists())),
        };

        let legacy_key = std::env::var(LEGACY_API_KEY_VAR).ok();
        Self::load_from_sources(config_file, None, legacy_key)
    }

    /// Load configuration with an explicit environment snapshot instead of the process one
    fn load_from_sources(
        config_file: Option<PathBuf>,
        environment: Option<config::Map<String, String>>,
        legacy_key: Option<String>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(config_file) = config_file {
            builder = builder.add_source(
                File::from(config_file)
                    .required(true)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(environment),
        );

        if let Some(key) = legacy_key.filter(|key| !key.is_empty()) {
            builder = builder
                .set_override("providers.api_key", key)
                .with_context(|| format!("Failed to apply {LEGACY_API_KEY_VAR}"))?;
        }

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DashboardConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("safebreathe").join("config.toml"))
    }

    /// Apply default values to fields left empty by a file or environment override
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.providers.openweather_base_url.is_empty() {
            self.providers.openweather_base_url = default_openweather_base_url();
        }
        if self.providers.open_meteo_base_url.is_empty() {
            self.providers.open_meteo_base_url = default_open_meteo_base_url();
        }
        if self.providers.air_quality_base_url.is_empty() {
            self.providers.air_quality_base_url = default_air_quality_base_url();
        }
        if self.providers.units.is_empty() {
            self.providers.units = default_units();
        }
        if self.providers.lang.is_empty() {
            self.providers.lang = default_lang();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.default_location.name.is_empty() {
            self.default_location.name = default_location_name();
        }
        if self.default_location.position_label.is_empty() {
            self.default_location.position_label = default_position_label();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the provider API key
    pub fn validate_api_key(&self) -> Result<()> {
        if let Some(api_key) = &self.providers.api_key {
            if api_key.trim().is_empty() {
                return Err(DashboardError::config(
                    "Provider API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(DashboardError::config("Server port cannot be 0").into());
        }

        if !(1..=300).contains(&self.server.request_timeout_seconds) {
            return Err(DashboardError::config(
                "Server request timeout must be between 1 and 300 seconds"
            ).into());
        }

        if !(1..=300).contains(&self.providers.timeout_seconds) {
            return Err(DashboardError::config(
                "Provider timeout must be between 1 and 300 seconds"
            ).into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DashboardError::config(
                format!("Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_log_levels.join(", ")
                )
            ).into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DashboardError::config(
                format!("Invalid log format '{}'. Must be one of: {}",
                    self.logging.format,
                    valid_log_formats.join(", ")
                )
            ).into());
        }

        let base_urls = [
            ("openweather", &self.providers.openweather_base_url),
            ("open-meteo", &self.providers.open_meteo_base_url),
            ("air-quality", &self.providers.air_quality_base_url),
        ];
        for (provider, url) in base_urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(DashboardError::config(
                    format!("The {provider} base URL must be a valid HTTP or HTTPS URL")
                ).into());
            }
        }

        Ok(())
    }

    /// Address the HTTP server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
