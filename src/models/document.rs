//! The weather document shared between fetcher and publisher

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ForecastDay, WeatherSnapshot};

/// Current conditions plus forecast for one city
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CityWeather {
    /// Conditions at fetch time
    pub current: WeatherSnapshot,
    /// Ordered per-day forecast entries
    pub forecast: Vec<ForecastDay>,
}

/// The complete output artifact of one fetcher run
///
/// Created fresh on every run and atomically replaces the prior file; no
/// history is retained. City names map in sorted order so that two runs over
/// identical API responses serialize identically modulo `generated_at`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WeatherDocument {
    /// When this document was generated
    pub generated_at: DateTime<Utc>,
    /// Per-city weather keyed by display name
    pub cities: BTreeMap<String, CityWeather>,
}

impl WeatherDocument {
    /// Create an empty document with the given generation timestamp
    #[must_use]
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            cities: BTreeMap::new(),
        }
    }

    /// Add one city's weather
    pub fn insert(&mut self, name: impl Into<String>, weather: CityWeather) {
        self.cities.insert(name.into(), weather);
    }

    /// True when no city was fetched successfully
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_weather() -> CityWeather {
        CityWeather {
            current: WeatherSnapshot {
                observed_at: Utc::now(),
                utc_offset_secs: 0,
                temperature_c: 20.0,
                description: "Clear sky".to_string(),
                humidity_pct: 40,
                wind_speed_ms: 3.0,
                wind_direction_deg: 90,
            },
            forecast: vec![ForecastDay {
                date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
                min_temp_c: 14.0,
                max_temp_c: 25.0,
                condition: "Clear sky".to_string(),
            }],
        }
    }

    #[test]
    fn test_document_insert() {
        let mut document = WeatherDocument::new(Utc::now());
        assert!(document.is_empty());

        document.insert("Austin", sample_weather());
        assert!(!document.is_empty());
        assert!(document.cities.contains_key("Austin"));
    }

    #[test]
    fn test_city_order_is_sorted() {
        let mut document = WeatherDocument::new(Utc::now());
        document.insert("Seattle", sample_weather());
        document.insert("Austin", sample_weather());

        let names: Vec<&String> = document.cities.keys().collect();
        assert_eq!(names, vec!["Austin", "Seattle"]);
    }

    #[test]
    fn test_document_roundtrips_through_json() {
        let mut document = WeatherDocument::new(Utc::now());
        document.insert("Austin", sample_weather());

        let json = serde_json::to_string_pretty(&document).unwrap();
        let parsed: WeatherDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.cities.len(), 1);
        assert_eq!(parsed.cities["Austin"].forecast.len(), 1);
    }
}
