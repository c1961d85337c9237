//! Weather API client for OpenWeather integration
//!
//! This module provides HTTP client functionality for retrieving current
//! conditions and the 5-day/3-hour forecast from the OpenWeather API, and
//! the conversion of raw responses into the domain models.

use crate::SkycastError;
use crate::config::ApiConfig;
use crate::models::{City, CityQuery, ForecastDay, WeatherSnapshot};
use anyhow::{Context, Result};
use tracing::{debug, instrument};

/// Weather API client for OpenWeather
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl WeatherApiClient {
    /// Create a new weather API client with the configured timeout
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let timeout = std::time::Duration::from_secs(config.timeout_seconds.into());

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("skycast/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Get current conditions for a city
    #[instrument(skip(self), fields(city = %city.name))]
    pub async fn current(&self, city: &City) -> Result<WeatherSnapshot> {
        let url = format!("{}/weather", self.config.base_url);
        let response = self.get(&url, city).await?;

        let current: openweather::CurrentResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse current weather response for {}", city.name))?;

        debug!(temp = current.main.temp, "current conditions received");
        Ok(openweather::snapshot_from(&current, &self.config.units))
    }

    /// Get the forecast for a city, summarized into local calendar days
    #[instrument(skip(self), fields(city = %city.name))]
    pub async fn forecast(&self, city: &City, horizon_days: u32) -> Result<Vec<ForecastDay>> {
        let url = format!("{}/forecast", self.config.base_url);
        let response = self.get(&url, city).await?;

        let forecast: openweather::ForecastResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse forecast response for {}", city.name))?;

        debug!(samples = forecast.list.len(), "forecast samples received");
        Ok(openweather::summarize_days(
            &forecast,
            &self.config.units,
            horizon_days,
        ))
    }

    async fn get(&self, url: &str, city: &City) -> Result<reqwest::Response> {
        let mut params: Vec<(&str, String)> = vec![
            ("appid", self.config.key.clone()),
            ("units", self.config.units.clone()),
            ("lang", self.config.lang.clone()),
        ];
        match &city.query {
            CityQuery::Name(query) => params.push(("q", query.clone())),
            CityQuery::Coordinates {
                latitude,
                longitude,
            } => {
                params.push(("lat", latitude.to_string()));
                params.push(("lon", longitude.to_string()));
            }
        }

        let response = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Request to weather API failed for {}", city.describe()))?;

        match response.error_for_status() {
            Ok(response) => Ok(response),
            Err(err) => {
                let status = err
                    .status()
                    .map_or_else(|| "unknown status".to_string(), |s| s.to_string());
                Err(SkycastError::api(format!(
                    "Weather API returned {status} for {}",
                    city.describe()
                ))
                .into())
            }
        }
    }
}

/// OpenWeather API response structures and conversion utilities
pub(crate) mod openweather {
    use crate::models::{ForecastDay, WeatherSnapshot};
    use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
    use serde::Deserialize;
    use std::collections::BTreeMap;

    /// Current conditions response from `/data/2.5/weather`
    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub dt: i64,
        /// Shift from UTC in seconds
        pub timezone: i32,
        pub main: MainData,
        #[serde(default)]
        pub weather: Vec<ConditionData>,
        #[serde(default)]
        pub wind: WindData,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        pub temp: f64,
        #[serde(default)]
        pub humidity: u8,
    }

    #[derive(Debug, Deserialize, Clone)]
    pub struct ConditionData {
        pub description: String,
    }

    #[derive(Debug, Deserialize, Default)]
    pub struct WindData {
        #[serde(default)]
        pub speed: f64,
        #[serde(default)]
        pub deg: u16,
    }

    /// 5-day/3-hour forecast response from `/data/2.5/forecast`
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub city: ForecastCity,
        pub list: Vec<ForecastSample>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastCity {
        /// Shift from UTC in seconds
        pub timezone: i32,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastSample {
        pub dt: i64,
        pub main: MainData,
        #[serde(default)]
        pub weather: Vec<ConditionData>,
    }

    /// Build a [`WeatherSnapshot`] from a current-conditions response
    #[must_use]
    pub fn snapshot_from(current: &CurrentResponse, units: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            observed_at: timestamp(current.dt),
            utc_offset_secs: current.timezone,
            temperature_c: to_celsius(current.main.temp, units),
            description: condition_description(&current.weather),
            humidity_pct: current.main.humidity,
            wind_speed_ms: to_meters_per_second(current.wind.speed, units),
            wind_direction_deg: current.wind.deg,
        }
    }

    /// Bucket 3-hour forecast samples by local calendar day and summarize
    /// each day into min/max temperature and the dominant condition.
    #[must_use]
    pub fn summarize_days(
        forecast: &ForecastResponse,
        units: &str,
        horizon_days: u32,
    ) -> Vec<ForecastDay> {
        let offset =
            FixedOffset::east_opt(forecast.city.timezone).unwrap_or_else(|| Utc.fix());

        let mut by_day: BTreeMap<NaiveDate, Vec<(f64, String)>> = BTreeMap::new();
        for sample in &forecast.list {
            let local_date = timestamp(sample.dt).with_timezone(&offset).date_naive();
            let temperature = to_celsius(sample.main.temp, units);
            let condition = condition_description(&sample.weather);
            by_day
                .entry(local_date)
                .or_default()
                .push((temperature, condition));
        }

        by_day
            .into_iter()
            .take(horizon_days as usize)
            .map(|(date, samples)| {
                let (min_temp_c, max_temp_c) = samples
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), (t, _)| {
                        (min.min(*t), max.max(*t))
                    });
                ForecastDay {
                    date,
                    min_temp_c,
                    max_temp_c,
                    condition: dominant_condition(&samples),
                }
            })
            .collect()
    }

    /// Normalize a temperature to Celsius based on the requested API units
    #[must_use]
    pub fn to_celsius(value: f64, units: &str) -> f64 {
        match units {
            "imperial" => (value - 32.0) * 5.0 / 9.0,
            "standard" => value - 273.15,
            _ => value,
        }
    }

    /// Normalize a wind speed to m/s; OpenWeather reports mph for imperial units
    #[must_use]
    pub fn to_meters_per_second(value: f64, units: &str) -> f64 {
        match units {
            "imperial" => value * 0.44704,
            _ => value,
        }
    }

    /// Capitalize the first character of a condition description
    #[must_use]
    pub fn title_case(text: &str) -> String {
        let mut chars = text.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        }
    }

    fn condition_description(conditions: &[ConditionData]) -> String {
        conditions
            .first()
            .map_or_else(|| "Unknown".to_string(), |c| title_case(&c.description))
    }

    fn timestamp(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
    }

    /// Most frequent condition among the day's samples; ties resolve to the
    /// lexicographically last candidate so repeated runs stay deterministic.
    fn dominant_condition(samples: &[(f64, String)]) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for (_, condition) in samples {
            *counts.entry(condition.as_str()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .max_by_key(|(_, count)| *count)
            .map_or_else(|| "Unknown".to_string(), |(condition, _)| condition.to_string())
    }

}
