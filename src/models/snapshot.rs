//! Current-conditions model and display methods

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Current weather conditions for one city at fetch time
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WeatherSnapshot {
    /// Observation timestamp reported by the API
    pub observed_at: DateTime<Utc>,
    /// Station UTC offset in seconds, for local-time display
    pub utc_offset_secs: i32,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Human-readable description of conditions
    pub description: String,
    /// Relative humidity percentage (0-100)
    pub humidity_pct: u8,
    /// Wind speed in m/s
    pub wind_speed_ms: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction_deg: u16,
}

impl WeatherSnapshot {
    /// Observation time shifted into the station's local offset
    #[must_use]
    pub fn local_time(&self) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix());
        self.observed_at.with_timezone(&offset)
    }

    /// Convert wind direction from degrees to cardinal direction
    #[must_use]
    pub fn wind_direction_to_cardinal(degrees: u16) -> &'static str {
        match degrees {
            0..=11 | 349..=360 => "N",
            12..=33 => "NNE",
            34..=56 => "NE",
            57..=78 => "ENE",
            79..=101 => "E",
            102..=123 => "ESE",
            124..=146 => "SE",
            147..=168 => "SSE",
            169..=191 => "S",
            192..=213 => "SSW",
            214..=236 => "SW",
            237..=258 => "WSW",
            259..=281 => "W",
            282..=303 => "WNW",
            304..=326 => "NW",
            327..=348 => "NNW",
            _ => "Unknown",
        }
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature_c)
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        let direction = Self::wind_direction_to_cardinal(self.wind_direction_deg);
        format!("{:.1} m/s {direction}", self.wind_speed_ms)
    }

    /// UTC offset label such as `UTC+2` or `UTC-9:30`
    #[must_use]
    pub fn utc_offset_label(&self) -> String {
        let sign = if self.utc_offset_secs >= 0 { '+' } else { '-' };
        let abs = self.utc_offset_secs.abs();
        let hours = abs / 3600;
        let minutes = (abs % 3600) / 60;
        if minutes == 0 {
            format!("UTC{sign}{hours}")
        } else {
            format!("UTC{sign}{hours}:{minutes:02}")
        }
    }
}
