//! Skiddle events-search client, plus the deterministic catalogue served
//! when no API key is configured so the rest of the stack always has
//! something to render.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::app::ports::{EventProvider, ProviderPage};
use crate::config::ProviderConfig;
use crate::constants::{PROVIDER_HOME_URL, PROVIDER_NAME, PROVIDER_RESULT_LIMIT};
use crate::domain::{EventVenue, NormalizedEvent, ProviderQuery};
use crate::error::{RadarError, Result};
use crate::search::normalize::normalize_batch;

pub struct SkiddleClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl SkiddleClient {
    pub fn new(config: &ProviderConfig, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, base_url: config.base_url.clone(), api_key })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl EventProvider for SkiddleClient {
    #[instrument(skip(self, query), fields(lat = query.lat, lng = query.lng))]
    async fn search(&self, query: &ProviderQuery) -> Result<ProviderPage> {
        let Some(api_key) = &self.api_key else {
            debug!("no provider key configured, serving mock catalogue");
            return Ok(mock_page(query));
        };

        let mut params: Vec<(&str, String)> = vec![
            ("api_key", api_key.clone()),
            ("latitude", query.lat.to_string()),
            ("longitude", query.lng.to_string()),
            ("radius", query.radius_miles.to_string()),
            ("keyword", query.keyword.clone()),
            ("order", "distance".to_string()),
            ("description", "1".to_string()),
            ("limit", PROVIDER_RESULT_LIMIT.to_string()),
        ];
        if let Some(min_date) = query.min_date {
            params.push(("minDate", min_date.format("%Y-%m-%d").to_string()));
        }
        if let Some(max_date) = query.max_date {
            params.push(("maxDate", max_date.format("%Y-%m-%d").to_string()));
        }
        let response = self.client.get(&self.base_url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RadarError::Provider {
                status: status.as_u16(),
                detail: detail.chars().take(200).collect(),
            });
        }

        let body: Value = response.json().await?;
        let raw = body
            .get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let batch = normalize_batch(&raw);
        let total = body
            .get("totalcount")
            .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
            .unwrap_or(batch.events.len() as u64);

        Ok(ProviderPage { events: batch.events, total, mock: false })
    }
}

/// Fixed venue/title/genre rows for keyless operation, with dates rolling
/// forward from the requested window start (or from today when the query
/// carries no window).
pub fn mock_page(query: &ProviderQuery) -> ProviderPage {
    const ROWS: &[(&str, &str, f64, f64, &str, &[&str])] = &[
        ("CORSICA STUDIOS", "LONDON", 51.4932, -0.0994, "SYSTEM:OVERRIDE", &["Techno"]),
        ("THE WAREHOUSE PROJECT", "MANCHESTER", 53.4744, -2.2564, "PRESSURE / ALL NIGHT", &["Techno", "Hard Techno"]),
        ("MOTION", "BRISTOL", 51.4452, -2.5966, "JUNGLE MASSIVE", &["Jungle", "Drum & Bass"]),
        ("SUB CLUB", "GLASGOW", 55.8596, -4.2688, "BASS COMMUNION", &["Drum & Bass"]),
        ("FABRIC", "LONDON", 51.5198, -0.1034, "ARCHIVE SESSION 001", &["Techno", "House"]),
        ("WIRE", "LEEDS", 53.7976, -1.5410, "WAREHOUSE PROTOCOL", &["Techno"]),
        ("LAKOTA", "BRISTOL", 51.4619, -2.5908, "SUBSONIC", &["House", "Garage"]),
        ("HIDDEN", "MANCHESTER", 53.4862, -2.2422, "FREQUENCY", &["Trance"]),
        ("BONGO CLUB", "EDINBURGH", 55.9501, -3.1851, "ZERO GRAVITY (DNB)", &["Drum & Bass"]),
        ("SWG3", "GLASGOW", 55.8655, -4.2518, "WARP DRIVE", &["Hard Dance"]),
        ("THE CAUSE", "LONDON", 51.5451, -0.0552, "HARD CODED", &["Techno"]),
        ("THE WHITE HOTEL", "MANCHESTER", 53.4879, -2.2366, "ANALOG SIGNAL", &["Techno", "Dubstep"]),
    ];

    let anchor = query.min_date.unwrap_or_else(|| Utc::now().date_naive());
    let events: Vec<NormalizedEvent> = ROWS
        .iter()
        .enumerate()
        .map(|(i, (venue, city, lat, lng, title, genres))| {
            let date = (anchor + ChronoDuration::days((i / 2) as i64))
                .format("%Y-%m-%d")
                .to_string();
            NormalizedEvent {
                id: format!("mock-{}", i + 1),
                provider: PROVIDER_NAME.to_string(),
                title: title.to_string(),
                start_date_time: format!("{date}T23:00:00"),
                end_date_time: Some(format!("{date}T06:00:00")),
                venue: EventVenue {
                    name: venue.to_string(),
                    address: None,
                    city: Some(city.to_string()),
                    lat: *lat,
                    lng: *lng,
                },
                price_text: (i % 3 != 0).then(|| format!("From £{:.2}", 10.0 + i as f64 * 2.5)),
                link: PROVIDER_HOME_URL.to_string(),
                genres: genres.iter().map(|g| g.to_string()).collect(),
            }
        })
        .collect();

    let total = events.len() as u64;
    ProviderPage { events, total, mock: true }
}
