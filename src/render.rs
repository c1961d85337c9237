//! HTML rendering for the dashboard page

use crate::models::{CityWeather, WeatherDocument};

const STYLE: &str = "\
body{font-family:sans-serif;margin:2rem auto;max-width:60rem;padding:0 1rem;color:#222}\
header{border-bottom:1px solid #ddd;margin-bottom:1.5rem}\
.generated{color:#777;font-size:.9rem}\
.cards{display:flex;flex-wrap:wrap;gap:1rem}\
.card{border:1px solid #ddd;border-radius:8px;padding:1rem;flex:1 1 16rem}\
.card h2{margin-top:0}\
.current{font-size:1.1rem;margin-bottom:.75rem}\
table{border-collapse:collapse;width:100%}\
td,th{text-align:left;padding:.2rem .5rem .2rem 0;font-size:.9rem}\
.empty{color:#777;font-style:italic}";

/// Render the full dashboard page for a document
#[must_use]
pub fn dashboard(document: &WeatherDocument) -> String {
    let mut body = String::new();
    if document.is_empty() {
        body.push_str(r#"<p class="empty">The last fetch produced no city data.</p>"#);
    } else {
        body.push_str(r#"<div class="cards">"#);
        for (name, weather) in &document.cities {
            body.push_str(&city_card(name, weather));
        }
        body.push_str("</div>");
    }

    page(
        &format!(
            r#"<header><h1>Skycast</h1><p class="generated">Generated at {}</p></header><main>{body}</main>"#,
            document.generated_at.format("%d-%m-%Y %H:%M UTC")
        ),
    )
}

/// Render the page shown before any fetcher run has produced a document
#[must_use]
pub fn no_data_page() -> String {
    page(
        r#"<header><h1>Skycast</h1></header><main><p class="empty">No data yet &mdash; run <code>skycast fetch</code> to generate the dashboard.</p></main>"#,
    )
}

fn page(content: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>Skycast</title><style>{STYLE}</style></head><body>{content}</body></html>"
    )
}

fn city_card(name: &str, weather: &CityWeather) -> String {
    let current = &weather.current;
    let mut rows = String::new();
    for day in &weather.forecast {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            day.date.format("%d-%m-%Y"),
            day.format_range(),
            escape(&day.condition)
        ));
    }

    format!(
        r#"<div class="card"><h2>{name}</h2><p class="current">{temp} &middot; {description}</p><p>Humidity {humidity}% &middot; Wind {wind}</p><p class="generated">Observed {observed} ({offset})</p><table><tr><th>Date</th><th>Min/Max</th><th>Conditions</th></tr>{rows}</table></div>"#,
        name = escape(name),
        temp = current.format_temperature(),
        description = escape(&current.description),
        humidity = current.humidity_pct,
        wind = current.format_wind(),
        observed = current.local_time().format("%d-%m-%Y %H:%M"),
        offset = current.utc_offset_label(),
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastDay, WeatherSnapshot};
    use chrono::{NaiveDate, Utc};

    fn document_with_city(name: &str) -> WeatherDocument {
        let mut document = WeatherDocument::new(Utc::now());
        document.insert(
            name,
            CityWeather {
                current: WeatherSnapshot {
                    observed_at: Utc::now(),
                    utc_offset_secs: 3600,
                    temperature_c: 19.5,
                    description: "Scattered clouds".to_string(),
                    humidity_pct: 55,
                    wind_speed_ms: 4.0,
                    wind_direction_deg: 270,
                },
                forecast: vec![ForecastDay {
                    date: NaiveDate::from_ymd_opt(2026, 8, 8).unwrap(),
                    min_temp_c: 12.0,
                    max_temp_c: 22.0,
                    condition: "Light rain".to_string(),
                }],
            },
        );
        document
    }

    #[test]
    fn test_dashboard_contains_city_card() {
        let html = dashboard(&document_with_city("Austin"));
        assert!(html.contains("<h2>Austin</h2>"));
        assert!(html.contains("19.5°C"));
        assert!(html.contains("Scattered clouds"));
        assert!(html.contains("Light rain"));
        assert!(html.contains("12° / 22°C"));
    }

    #[test]
    fn test_dashboard_empty_document() {
        let html = dashboard(&WeatherDocument::new(Utc::now()));
        assert!(html.contains("no city data"));
    }

    #[test]
    fn test_no_data_page_mentions_fetch() {
        let html = no_data_page();
        assert!(html.contains("No data yet"));
        assert!(html.contains("skycast fetch"));
    }

    #[test]
    fn test_city_names_are_escaped() {
        let html = dashboard(&document_with_city("<script>Austin"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;Austin"));
    }
}
