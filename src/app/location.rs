//! Debounced free-text location resolution, causally upstream of the search
//! flow. Keeps its own (shorter) quiescence window and its own stale-lookup
//! discipline, independent of the search debouncer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use crate::app::debounce::Debouncer;
use crate::app::ports::Geocoder;
use crate::constants::GEOCODE_DEBOUNCE_MS;
use crate::domain::GeocodedLocation;

/// Turns a stream of partial location text into at most one current geocoded
/// location. Only the most recently submitted lookup may publish a result.
pub struct LocationFlow {
    geocoder: Arc<dyn Geocoder>,
    debouncer: Debouncer,
    resolved: Arc<Mutex<Option<GeocodedLocation>>>,
    seq: Arc<AtomicU64>,
}

impl LocationFlow {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self::with_window(geocoder, Duration::from_millis(GEOCODE_DEBOUNCE_MS))
    }

    pub fn with_window(geocoder: Arc<dyn Geocoder>, quiet: Duration) -> Self {
        Self {
            geocoder,
            debouncer: Debouncer::new(quiet),
            resolved: Arc::new(Mutex::new(None)),
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The latest successfully resolved location, if any.
    pub fn resolved(&self) -> Option<GeocodedLocation> {
        self.resolved.lock().expect("location state poisoned").clone()
    }

    /// Register a location-input edit. Lookup failures and no-match results
    /// leave the previous resolution in place.
    pub fn edit(&self, text: String) -> tokio::task::JoinHandle<()> {
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let seq = Arc::clone(&self.seq);
        let geocoder = Arc::clone(&self.geocoder);
        let resolved = Arc::clone(&self.resolved);
        self.debouncer.submit(async move {
            match geocoder.geocode(&text).await {
                Ok(Some(location)) => {
                    if seq.load(Ordering::SeqCst) == ticket {
                        *resolved.lock().expect("location state poisoned") = Some(location);
                    } else {
                        debug!(ticket, "geocode superseded, discarding result");
                    }
                }
                Ok(None) => debug!(query = %text, "no geocoding match"),
                Err(err) => warn!(error = %err, "geocoding failed"),
            }
        })
    }
}
