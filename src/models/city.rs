//! City model for configured query targets

use serde::{Deserialize, Serialize};

/// How a city is looked up against the weather API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum CityQuery {
    /// Free-text name query, optionally country-qualified (`"Austin,US"`)
    Name(String),
    /// Explicit geographic coordinates
    Coordinates { latitude: f64, longitude: f64 },
}

/// A configured city, immutable once loaded from configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct City {
    /// Display name used as the document key and on the dashboard
    pub name: String,
    /// Query sent to the weather API
    pub query: CityQuery,
}

impl City {
    /// Create a city queried by name
    #[must_use]
    pub fn by_name(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: CityQuery::Name(query.into()),
        }
    }

    /// Create a city queried by coordinates
    #[must_use]
    pub fn by_coordinates(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            query: CityQuery::Coordinates {
                latitude,
                longitude,
            },
        }
    }

    /// Describe the query target for log output
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.query {
            CityQuery::Name(query) => format!("{} (q={query})", self.name),
            CityQuery::Coordinates {
                latitude,
                longitude,
            } => format!("{} ({latitude:.4}, {longitude:.4})", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_by_name() {
        let city = City::by_name("Austin", "Austin,US");
        assert_eq!(city.name, "Austin");
        assert_eq!(city.query, CityQuery::Name("Austin,US".to_string()));
        assert_eq!(city.describe(), "Austin (q=Austin,US)");
    }

    #[test]
    fn test_city_by_coordinates() {
        let city = City::by_coordinates("Seattle", 47.6062, -122.3321);
        assert_eq!(city.describe(), "Seattle (47.6062, -122.3321)");
    }
}
