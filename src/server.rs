//! HTTP surface: the events-search and geocoding endpoints plus a health
//! check. Both public endpoints always answer with well-formed, cacheable
//! JSON; upstream trouble maps to 502 and anything else to 500.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Query,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Extension, Router,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::app::ports::{EventProvider, Geocoder};
use crate::config::Config;
use crate::constants::{EVENTS_CACHE_MAX_AGE, GEOCODE_CACHE_MAX_AGE};
use crate::domain::ProviderQuery;
use crate::error::{RadarError, Result};
use crate::search::query;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Strict `YYYY-MM-DD` or nothing; malformed date parameters are ignored.
fn parse_iso_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    if !ISO_DATE.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn cached_json(status: StatusCode, max_age: u32, body: serde_json::Value) -> Response {
    let mut response = (status, Json(body)).into_response();
    let value = HeaderValue::from_str(&format!("public, max-age={max_age}"))
        .expect("static cache header");
    response.headers_mut().insert(header::CACHE_CONTROL, value);
    response
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "rave-radar",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
struct EventsParams {
    lat: Option<String>,
    lng: Option<String>,
    radius: Option<String>,
    #[serde(rename = "minDate")]
    min_date: Option<String>,
    #[serde(rename = "maxDate")]
    max_date: Option<String>,
    genres: Option<String>,
    keyword: Option<String>,
}

async fn events(
    Extension(provider): Extension<Arc<dyn EventProvider>>,
    Query(params): Query<EventsParams>,
) -> Response {
    let coords = params
        .lat
        .as_deref()
        .zip(params.lng.as_deref())
        .and_then(|(lat, lng)| Some((lat.parse::<f64>().ok()?, lng.parse::<f64>().ok()?)))
        .filter(|(lat, lng)| lat.is_finite() && lng.is_finite());
    let Some((lat, lng)) = coords else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "lat and lng are required and must be numbers" })),
        )
            .into_response();
    };

    let radius_miles = params
        .radius
        .as_deref()
        .map(query::clamp_radius)
        .unwrap_or(crate::constants::DEFAULT_RADIUS_MILES);

    // Absent or malformed dates are simply not forwarded upstream.
    let min_date = parse_iso_date(params.min_date.as_deref());
    let max_date = parse_iso_date(params.max_date.as_deref());

    let genres: Vec<String> = params
        .genres
        .as_deref()
        .map(|g| {
            g.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let provider_query = ProviderQuery {
        lat,
        lng,
        radius_miles,
        keyword: query::build_keyword(&genres, params.keyword.as_deref().unwrap_or("")),
        min_date,
        max_date,
    };

    match provider.search(&provider_query).await {
        Ok(page) => cached_json(
            StatusCode::OK,
            EVENTS_CACHE_MAX_AGE,
            json!({ "events": page.events, "total": page.total, "mock": page.mock }),
        ),
        Err(RadarError::Provider { status, detail }) => {
            warn!(status, "provider rejected search");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "Events provider error", "status": status, "detail": detail })),
            )
                .into_response()
        }
        Err(err) => {
            error!(error = %err, "events search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch events" })),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeParams {
    q: Option<String>,
}

async fn geocode(
    Extension(geocoder): Extension<Arc<dyn Geocoder>>,
    Query(params): Query<GeocodeParams>,
) -> Response {
    let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing query parameter 'q'" })),
        )
            .into_response();
    };

    match geocoder.geocode(q).await {
        Ok(Some(location)) => cached_json(
            StatusCode::OK,
            GEOCODE_CACHE_MAX_AGE,
            serde_json::to_value(&location).unwrap_or_default(),
        ),
        Ok(None) => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": "Location not found" }))).into_response()
        }
        Err(RadarError::Provider { .. }) => {
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": "Geocoding failed" }))).into_response()
        }
        Err(err) => {
            error!(error = %err, "geocoding failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Geocoding service error" })),
            )
                .into_response()
        }
    }
}

/// Build the router with all routes and permissive GET CORS.
pub fn create_router(
    provider: Arc<dyn EventProvider>,
    geocoder: Arc<dyn Geocoder>,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/events", get(events))
        .route("/api/geocode", get(geocode))
        .layer(Extension(provider))
        .layer(Extension(geocoder))
        .layer(cors)
}

/// Bind and serve until shutdown.
pub async fn run(
    config: &Config,
    provider: Arc<dyn EventProvider>,
    geocoder: Arc<dyn Geocoder>,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| RadarError::Config(format!("invalid bind address: {e}")))?;
    let router = create_router(provider, geocoder);

    info!(%addr, "serving rave-radar API");
    hyper::Server::bind(&addr)
        .serve(router.into_make_service())
        .await
        .map_err(|e| RadarError::Server(e.to_string()))
}
