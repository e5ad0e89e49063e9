//! Collaborator boundaries the application layer depends on. Concrete
//! implementations live in `crate::apis`; tests script their own.

use async_trait::async_trait;

use crate::domain::{GeocodedLocation, NormalizedEvent, ProviderQuery};
use crate::error::Result;

/// One page of provider search results, already normalized.
#[derive(Debug, Clone, Default)]
pub struct ProviderPage {
    pub events: Vec<NormalizedEvent>,
    pub total: u64,
    /// True when the page came from the built-in catalogue because no
    /// provider key is configured.
    pub mock: bool,
}

/// Events-search provider boundary.
#[async_trait]
pub trait EventProvider: Send + Sync {
    async fn search(&self, query: &ProviderQuery) -> Result<ProviderPage>;
}

/// Free-text address lookup boundary. `Ok(None)` means the query resolved to
/// no known place, as opposed to the lookup itself failing.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedLocation>>;
}
