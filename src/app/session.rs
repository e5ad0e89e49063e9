//! The asynchronous search lifecycle: one logical search at a time, newest
//! call wins, superseded calls never touch state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::app::debounce::Debouncer;
use crate::app::ports::EventProvider;
use crate::constants::SEARCH_DEBOUNCE_MS;
use crate::domain::{NormalizedEvent, SearchFilters};
use crate::error::{RadarError, Result};
use crate::search::{dates, query};

/// Generic retryable message shown for any provider/network failure. The
/// underlying detail goes to the log, not to the caller.
const SEARCH_FAILED_MESSAGE: &str = "Failed to load events. Try again.";

/// Observable result/loading/error state of a session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub events: Vec<NormalizedEvent>,
    pub total: u64,
    pub mock: bool,
    pub loading: bool,
    pub error: Option<String>,
}

/// Owns one logical search at a time against an [`EventProvider`].
///
/// Every search claims a fresh sequence number; claiming it invalidates any
/// in-flight call, whose response is then discarded on arrival no matter when
/// it completes. Last writer wins by sequence, not by arrival order.
pub struct SearchSession {
    provider: Arc<dyn EventProvider>,
    state: Mutex<SessionState>,
    seq: AtomicU64,
}

impl SearchSession {
    pub fn new(provider: Arc<dyn EventProvider>) -> Self {
        Self {
            provider,
            state: Mutex::new(SessionState::default()),
            seq: AtomicU64::new(0),
        }
    }

    /// Current observable state.
    pub fn snapshot(&self) -> SessionState {
        self.state.lock().expect("session state poisoned").clone()
    }

    /// Run one search. Fails immediately (state untouched) when no location
    /// is set. Provider failures do not error here: they surface through
    /// [`SessionState::error`], with the previous result set left in place so
    /// the caller never flashes to empty mid-error.
    ///
    /// `today` is the caller's clock; date-range resolution never reads the
    /// ambient time.
    pub async fn start_search(&self, filters: &SearchFilters, today: NaiveDate) -> Result<()> {
        let location = filters
            .location
            .as_ref()
            .ok_or_else(|| RadarError::Validation("set a location to search".to_string()))?;

        // Claiming the next sequence number is what cancels the previous
        // in-flight search.
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.lock().expect("session state poisoned");
            state.loading = true;
            state.error = None;
        }

        let bounds = dates::resolve(filters.date_range, filters.custom_start, filters.custom_end, today);
        let provider_query = query::build_query(location, filters, bounds);
        info!(
            lat = provider_query.lat,
            lng = provider_query.lng,
            radius = provider_query.radius_miles,
            min_date = ?provider_query.min_date,
            max_date = ?provider_query.max_date,
            "starting search"
        );

        let outcome = self.provider.search(&provider_query).await;

        // The supersession check and the state write must be atomic: the
        // sequence is re-read under the state lock, so a newer call cannot
        // claim its ticket between our check and our write.
        let mut state = self.state.lock().expect("session state poisoned");
        if self.seq.load(Ordering::SeqCst) != ticket {
            // Superseded while in flight. The newer call owns the terminal
            // state transition; we mutate nothing, not even `loading`.
            debug!(ticket, "search superseded, discarding response");
            return Ok(());
        }
        state.loading = false;
        match outcome {
            Ok(page) => {
                state.total = page.total;
                state.mock = page.mock;
                state.events = page.events;
                state.error = None;
            }
            Err(err) => {
                warn!(error = %err, "search failed");
                state.error = Some(SEARCH_FAILED_MESSAGE.to_string());
                // events/total deliberately retained from the last success.
            }
        }
        Ok(())
    }
}

/// Debounced front door for filter edits: each edit resets the quiescence
/// window, and only the last edit of a burst actually searches.
pub struct DebouncedSearch {
    session: Arc<SearchSession>,
    debouncer: Debouncer,
}

impl DebouncedSearch {
    pub fn new(session: Arc<SearchSession>) -> Self {
        Self::with_window(session, Duration::from_millis(SEARCH_DEBOUNCE_MS))
    }

    pub fn with_window(session: Arc<SearchSession>, quiet: Duration) -> Self {
        Self { session, debouncer: Debouncer::new(quiet) }
    }

    pub fn session(&self) -> &Arc<SearchSession> {
        &self.session
    }

    /// Register a filter edit. Validation failures inside the debounced call
    /// (no location yet) are ignored; there is nobody left to report them to.
    pub fn edit(&self, filters: SearchFilters, today: NaiveDate) -> tokio::task::JoinHandle<()> {
        let session = Arc::clone(&self.session);
        self.debouncer.submit(async move {
            let _ = session.start_search(&filters, today).await;
        })
    }
}
