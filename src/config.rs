use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::{NOMINATIM_SEARCH_URL, SKIDDLE_SEARCH_URL};
use crate::error::Result;

/// Runtime configuration. Read from `config.toml` when present, otherwise
/// all defaults apply; the provider API key only ever comes from the
/// environment (`SKIDDLE_API_KEY`), never from the file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub geocoder: GeocoderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8080 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self { base_url: SKIDDLE_SEARCH_URL.to_string(), timeout_seconds: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Country suffix appended to every lookup query.
    pub query_suffix: String,
    /// ISO country code restriction passed to the lookup service.
    pub country_code: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: NOMINATIM_SEARCH_URL.to_string(),
            timeout_seconds: 10,
            query_suffix: "UK".to_string(),
            country_code: "gb".to_string(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to
    /// defaults when the file is absent.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// The Skiddle API key, when configured and non-empty.
    pub fn provider_api_key() -> Option<String> {
        std::env::var("SKIDDLE_API_KEY").ok().filter(|k| !k.trim().is_empty())
    }
}
