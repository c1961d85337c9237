//! Publisher web server: serves the dashboard from the weather document

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
};
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::config::ServeConfig;
use crate::models::WeatherDocument;
use crate::{render, store};

#[derive(Clone)]
pub struct AppState {
    config: Arc<ServeConfig>,
    cache: Arc<RwLock<Option<CachedDocument>>>,
}

struct CachedDocument {
    fetched_at: Instant,
    document: WeatherDocument,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServeConfig) -> Self {
        Self {
            config: Arc::new(config),
            cache: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build the publisher router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/data", get(api_data))
        .with_state(state)
        .layer(cors)
}

/// Bind the configured address and serve until shutdown
pub async fn run(config: ServeConfig) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Dashboard running at http://{addr}");
    axum::serve(listener, app)
        .await
        .with_context(|| "Web server terminated")?;
    Ok(())
}

/// The dashboard always reads the latest document from disk
async fn index(State(state): State<AppState>) -> Html<String> {
    match store::load(&state.config.input_path) {
        Ok(document) => Html(render::dashboard(&document)),
        Err(err) => {
            warn!(error = %err, "serving no-data page");
            Html(render::no_data_page())
        }
    }
}

/// Raw document for programmatic consumers, behind a short-lived cache
async fn api_data(
    State(state): State<AppState>,
) -> Result<Json<WeatherDocument>, (StatusCode, Json<Value>)> {
    match cached_document(&state).await {
        Ok(document) => Ok(Json(document)),
        Err(err) => {
            warn!(error = %err, "document unavailable for /api/data");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": err.user_message() })),
            ))
        }
    }
}

async fn cached_document(state: &AppState) -> crate::Result<WeatherDocument> {
    let ttl = Duration::from_secs(state.config.cache_ttl_seconds);

    {
        let guard = state.cache.read().await;
        if let Some(entry) = guard.as_ref() {
            if entry.fetched_at.elapsed() < ttl {
                return Ok(entry.document.clone());
            }
        }
    }

    let document = store::load(&state.config.input_path)?;
    let mut guard = state.cache.write().await;
    *guard = Some(CachedDocument {
        fetched_at: Instant::now(),
        document: document.clone(),
    });
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggingConfig, ServerConfig};
    use crate::models::{CityWeather, ForecastDay, WeatherSnapshot};
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{NaiveDate, Utc};
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn serve_config(input_path: &Path) -> ServeConfig {
        ServeConfig {
            input_path: input_path.to_path_buf(),
            server: ServerConfig::default(),
            cache_ttl_seconds: 120,
            logging: LoggingConfig::default(),
        }
    }

    fn write_document(path: &Path) {
        let mut document = WeatherDocument::new(Utc::now());
        document.insert(
            "Austin",
            CityWeather {
                current: WeatherSnapshot {
                    observed_at: Utc::now(),
                    utc_offset_secs: -21600,
                    temperature_c: 33.0,
                    description: "Clear sky".to_string(),
                    humidity_pct: 30,
                    wind_speed_ms: 2.0,
                    wind_direction_deg: 180,
                },
                forecast: vec![ForecastDay {
                    date: NaiveDate::from_ymd_opt(2026, 8, 8).unwrap(),
                    min_temp_c: 25.0,
                    max_temp_c: 37.0,
                    condition: "Clear sky".to_string(),
                }],
            },
        );
        store::write_atomic(&document, path).unwrap();
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weather.json");
        write_document(&path);

        let app = router(AppState::new(serve_config(&path)));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Austin"));
        assert!(body.contains("33.0°C"));
    }

    #[tokio::test]
    async fn test_index_without_document_shows_no_data_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");

        let app = router(AppState::new(serve_config(&path)));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("No data yet"));
    }

    #[tokio::test]
    async fn test_api_data_returns_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weather.json");
        write_document(&path);

        let app = router(AppState::new(serve_config(&path)));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/data")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        let document: WeatherDocument = serde_json::from_str(&body).unwrap();
        assert!(document.cities.contains_key("Austin"));
    }

    #[tokio::test]
    async fn test_api_data_without_document_is_503() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");

        let app = router(AppState::new(serve_config(&path)));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/data")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_string(response).await;
        assert!(body.contains("error"));
    }

    #[tokio::test]
    async fn test_index_picks_up_replaced_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weather.json");

        let state = AppState::new(serve_config(&path));
        let app = router(state);

        let first = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(body_string(first).await.contains("No data yet"));

        write_document(&path);
        let second = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(body_string(second).await.contains("Austin"));
    }
}
