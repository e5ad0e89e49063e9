//! Nominatim-backed address lookup, restricted to one country. Returns the
//! single best match.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::app::ports::Geocoder;
use crate::config::GeocoderConfig;
use crate::constants::GEOCODER_USER_AGENT;
use crate::domain::GeocodedLocation;
use crate::error::{RadarError, Result};

pub struct NominatimGeocoder {
    client: reqwest::Client,
    config: GeocoderConfig,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(GEOCODER_USER_AGENT)
            .build()?;
        Ok(Self { client, config: config.clone() })
    }
}

/// Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedLocation>> {
        let scoped = format!("{}, {}", query.trim(), self.config.query_suffix);
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("q", scoped.as_str()),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", self.config.country_code.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RadarError::Provider {
                status: status.as_u16(),
                detail: "geocoding failed".to_string(),
            });
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        let Some(place) = places.into_iter().next() else {
            debug!(query, "no geocoding match");
            return Ok(None);
        };

        // A match with unparseable coordinates is no match at all.
        let (Ok(lat), Ok(lng)) = (place.lat.parse::<f64>(), place.lon.parse::<f64>()) else {
            return Ok(None);
        };

        Ok(Some(GeocodedLocation { lat, lng, display_name: place.display_name }))
    }
}
