//! The fetch run: query every configured city and assemble one document

use crate::api::WeatherApiClient;
use crate::config::FetchConfig;
use crate::models::{City, CityWeather, WeatherDocument};
use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

/// Outcome counters for one fetch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Cities that produced a complete entry
    pub succeeded: usize,
    /// Cities that failed and were omitted from the document
    pub failed: usize,
}

/// Fetch current conditions and forecast for every configured city.
///
/// Queries are dispatched concurrently up to the configured limit. A failed
/// city is logged and omitted; it never aborts the run. The caller decides
/// the exit status from the returned [`RunSummary`].
pub async fn run(config: &FetchConfig) -> Result<(WeatherDocument, RunSummary)> {
    let client = WeatherApiClient::new(&config.api)?;
    let cities = config.cities();
    let horizon_days = config.forecast_horizon_days;

    info!(cities = cities.len(), horizon_days, "starting fetch run");

    let results: Vec<(City, Result<CityWeather>)> = stream::iter(cities)
        .map(|city| {
            let client = client.clone();
            async move {
                let outcome = fetch_city(&client, &city, horizon_days).await;
                (city, outcome)
            }
        })
        .buffer_unordered(config.api.max_concurrent_requests as usize)
        .collect()
        .await;

    Ok(collect(results, Utc::now()))
}

/// Both queries for one city; the entry is ready only when both resolve
async fn fetch_city(
    client: &WeatherApiClient,
    city: &City,
    horizon_days: u32,
) -> Result<CityWeather> {
    let (current, forecast) =
        tokio::try_join!(client.current(city), client.forecast(city, horizon_days))?;
    Ok(CityWeather { current, forecast })
}

/// Assemble the document from per-city outcomes
fn collect(
    results: Vec<(City, Result<CityWeather>)>,
    generated_at: DateTime<Utc>,
) -> (WeatherDocument, RunSummary) {
    let mut document = WeatherDocument::new(generated_at);
    let mut failed = 0;

    for (city, outcome) in results {
        match outcome {
            Ok(weather) => {
                info!(
                    city = %city.name,
                    forecast_days = weather.forecast.len(),
                    "city fetched"
                );
                document.insert(city.name, weather);
            }
            Err(err) => {
                warn!(city = %city.name, error = %err, "city fetch failed, omitting");
                failed += 1;
            }
        }
    }

    let summary = RunSummary {
        succeeded: document.cities.len(),
        failed,
    };
    (document, summary)
}
