//! Per-day forecast entry model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One predicted local calendar day for one city
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastDay {
    /// Local calendar date this entry covers
    pub date: NaiveDate,
    /// Minimum temperature in Celsius
    pub min_temp_c: f64,
    /// Maximum temperature in Celsius
    pub max_temp_c: f64,
    /// Dominant conditions summary for the day
    pub condition: String,
}

impl ForecastDay {
    /// Format the min/max range with unit
    #[must_use]
    pub fn format_range(&self) -> String {
        format!("{:.0}° / {:.0}°C", self.min_temp_c, self.max_temp_c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_range() {
        let day = ForecastDay {
            date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            min_temp_c: 12.4,
            max_temp_c: 23.6,
            condition: "Light rain".to_string(),
        };
        assert_eq!(day.format_range(), "12° / 24°C");
    }
}
