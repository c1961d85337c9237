//! `skycast` - city weather fetcher and dashboard publisher
//!
//! Two components composed through a shared JSON document on disk: the
//! fetcher queries a weather API for current conditions and a multi-day
//! forecast per configured city and atomically writes one document; the
//! publisher serves that document as an HTML dashboard. Freshness is
//! governed entirely by how often the fetcher is re-run (manually or via
//! cron).

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod render;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use config::{FetchConfig, ServeConfig};
pub use error::SkycastError;
pub use fetch::RunSummary;
pub use models::{City, CityWeather, ForecastDay, WeatherDocument, WeatherSnapshot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;
