//! Configuration management for the skycast pipeline
//!
//! Handles loading the fetcher and publisher configuration from TOML files
//! and environment variables, and provides validation for all settings.
//! The two components carry independent configuration sets; each is loaded
//! once at process start and never mutated afterwards.

use crate::SkycastError;
use crate::models::{City, CityQuery};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configuration file path
pub const CONFIG_PATH_ENV: &str = "SKYCAST_CONFIG";

/// Fetcher configuration: cities, credentials, output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Weather API settings
    pub api: ApiConfig,
    /// Ordered list of cities to fetch
    pub cities: Vec<CityEntry>,
    /// Forecast horizon in days
    #[serde(default = "default_forecast_horizon")]
    pub forecast_horizon_days: u32,
    /// Where the weather document is written; stdout when absent
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OpenWeather API key
    pub key: String,
    /// Base URL for the weather API
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Units requested from the API ("metric", "imperial" or "standard")
    #[serde(default = "default_units")]
    pub units: String,
    /// Language for condition descriptions
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Upper bound on in-flight API requests
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: u32,
}

/// One configured city; `query` falls back to `name`, explicit coordinates win
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityEntry {
    /// Display name
    pub name: String,
    /// Optional country-qualified query string ("Austin,US")
    #[serde(default)]
    pub query: Option<String>,
    /// Optional latitude in decimal degrees
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Optional longitude in decimal degrees
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl CityEntry {
    /// Resolve this entry into a query-ready [`City`]
    #[must_use]
    pub fn to_city(&self) -> City {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => City {
                name: self.name.clone(),
                query: CityQuery::Coordinates {
                    latitude,
                    longitude,
                },
            },
            _ => City {
                name: self.name.clone(),
                query: CityQuery::Name(self.query.clone().unwrap_or_else(|| self.name.clone())),
            },
        }
    }
}

/// Publisher configuration: input document, bind address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Path of the weather document written by the fetcher
    pub input_path: PathBuf,
    /// Web server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// TTL for the in-memory document cache behind `/api/data`
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bind address for the publisher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging settings shared by both components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_api_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_max_concurrent() -> u32 {
    8
}

fn default_forecast_horizon() -> u32 {
    5
}

fn default_cache_ttl() -> u64 {
    120
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
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

impl LoggingConfig {
    /// Initialize the global tracing subscriber from this section.
    /// `RUST_LOG` wins over the configured level when set. Logs go to
    /// stderr so stdout stays clean for the document debug mode.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.clone()));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);
        let result = if self.format == "json" {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        if let Err(err) = result {
            eprintln!("tracing subscriber already initialized: {err}");
        }
    }

    fn validate(&self, component: &str) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.level.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid {component} log level '{}'. Must be one of: {}",
                self.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.format.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid {component} log format '{}'. Must be one of: {}",
                self.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

impl FetchConfig {
    /// Load the fetcher configuration, searching the default locations
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load the fetcher configuration from an explicit path or the search order
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let path = resolve_config_file(config_path, "fetch.toml")?;
        let mut config: FetchConfig = read_config(&path)?;
        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    /// Resolved city list in configured order
    #[must_use]
    pub fn cities(&self) -> Vec<City> {
        self.cities.iter().map(CityEntry::to_city).collect()
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.api.base_url.is_empty() {
            self.api.base_url = default_api_base_url();
        }
        if self.api.units.is_empty() {
            self.api.units = default_units();
        }
        if self.api.lang.is_empty() {
            self.api.lang = default_lang();
        }
        if self.api.timeout_seconds == 0 {
            self.api.timeout_seconds = default_timeout();
        }
        if self.api.max_concurrent_requests == 0 {
            self.api.max_concurrent_requests = default_max_concurrent();
        }
        if self.forecast_horizon_days == 0 {
            self.forecast_horizon_days = default_forecast_horizon();
        }
    }

    /// Validate all fetcher settings
    pub fn validate(&self) -> Result<()> {
        if self.api.key.trim().is_empty() {
            return Err(SkycastError::config(
                "Weather API key cannot be empty. Set api.key in the config file.",
            )
            .into());
        }

        if self.api.key.len() < 8 || self.api.key.len() > 100 {
            return Err(SkycastError::config(
                "Weather API key appears to be invalid. Please check your API key.",
            )
            .into());
        }

        let valid_units = ["metric", "imperial", "standard"];
        if !valid_units.contains(&self.api.units.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid units '{}'. Must be one of: {}",
                self.api.units,
                valid_units.join(", ")
            ))
            .into());
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(
                SkycastError::config("Weather API base URL must be an HTTP or HTTPS URL").into(),
            );
        }

        if self.api.timeout_seconds > 300 {
            return Err(SkycastError::config("Request timeout cannot exceed 300 seconds").into());
        }

        if self.api.max_concurrent_requests > 32 {
            return Err(
                SkycastError::config("Concurrent request limit cannot exceed 32").into(),
            );
        }

        if self.forecast_horizon_days > 7 {
            return Err(
                SkycastError::config("Forecast horizon cannot exceed 7 days").into(),
            );
        }

        if self.cities.is_empty() {
            return Err(SkycastError::config(
                "At least one city must be configured under [[cities]]",
            )
            .into());
        }

        for entry in &self.cities {
            if entry.name.trim().is_empty() {
                return Err(SkycastError::config("City name cannot be empty").into());
            }
            if entry.latitude.is_some() != entry.longitude.is_some() {
                return Err(SkycastError::config(format!(
                    "City '{}' must set both latitude and longitude or neither",
                    entry.name
                ))
                .into());
            }
        }

        self.logging.validate("fetcher")
    }
}

impl ServeConfig {
    /// Load the publisher configuration, searching the default locations
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load the publisher configuration from an explicit path or the search order
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let path = resolve_config_file(config_path, "serve.toml")?;
        let config: ServeConfig = read_config(&path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all publisher settings
    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(SkycastError::config("input_path cannot be empty").into());
        }

        if self.server.host.trim().is_empty() {
            return Err(SkycastError::config("Server host cannot be empty").into());
        }

        if self.cache_ttl_seconds > 3600 {
            return Err(
                SkycastError::config("Cache TTL cannot exceed 3600 seconds (1 hour)").into(),
            );
        }

        self.logging.validate("publisher")
    }
}

/// Candidate configuration paths in search order: explicit flag, the
/// `SKYCAST_CONFIG` environment variable, `./config/<name>`, `./<name>`,
/// then the user configuration directory.
#[must_use]
pub fn candidate_paths(explicit: Option<PathBuf>, file_name: &str) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
        candidates.push(path);
    }
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from("config").join(file_name));
    candidates.push(PathBuf::from(file_name));
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("skycast").join(file_name));
    }
    candidates
}

fn resolve_config_file(explicit: Option<PathBuf>, file_name: &str) -> Result<PathBuf> {
    // An explicit path is authoritative; only the search order may fall through.
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path);
        }
        return Err(SkycastError::config(format!(
            "Configuration file not found: {}",
            path.display()
        ))
        .into());
    }

    for path in candidate_paths(None, file_name) {
        if path.exists() {
            return Ok(path);
        }
    }

    Err(SkycastError::config(format!(
        "No configuration file found. Use --config, set {CONFIG_PATH_ENV}, or provide one at ./config/{file_name}"
    ))
    .into())
}

fn read_config<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let settings = Config::builder()
        .add_source(File::from(path.clone()).format(config::FileFormat::Toml))
        .add_source(
            Environment::with_prefix("SKYCAST")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

    settings
        .try_deserialize()
        .with_context(|| format!("Failed to parse configuration in {}", path.display()))
}
