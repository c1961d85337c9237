//! Data models for the skycast pipeline
//!
//! This module contains the core domain models organized by concern:
//! - City: Configured city identifier used to query the weather API
//! - Snapshot: Current weather conditions for one city
//! - Forecast: Summarized per-day forecast entries
//! - Document: The complete JSON artifact shared between fetcher and publisher

pub mod city;
pub mod document;
pub mod forecast;
pub mod snapshot;

// Re-export all public types for convenient access
pub use city::{City, CityQuery};
pub use document::{CityWeather, WeatherDocument};
pub use forecast::ForecastDay;
pub use snapshot::WeatherSnapshot;
