//! Search-session lifecycle: single-flight invalidation, error handling and
//! the debounced flows.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use rave_radar::app::location::LocationFlow;
use rave_radar::app::ports::{EventProvider, Geocoder, ProviderPage};
use rave_radar::app::session::{DebouncedSearch, SearchSession};
use rave_radar::domain::{
    EventVenue, GeocodedLocation, NormalizedEvent, ProviderQuery, SearchFilters,
};
use rave_radar::error::RadarError;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
}

fn event(id: &str) -> NormalizedEvent {
    NormalizedEvent {
        id: id.to_string(),
        provider: "skiddle".to_string(),
        title: id.to_uppercase(),
        start_date_time: "2025-06-20T23:00:00".to_string(),
        end_date_time: None,
        venue: EventVenue {
            name: "Motion".to_string(),
            address: None,
            city: Some("Bristol".to_string()),
            lat: 51.4452,
            lng: -2.5966,
        },
        price_text: None,
        link: "https://www.skiddle.com/".to_string(),
        genres: vec![],
    }
}

fn page(id: &str) -> ProviderPage {
    ProviderPage { events: vec![event(id)], total: 1, mock: false }
}

fn located_filters() -> SearchFilters {
    SearchFilters {
        location: Some(GeocodedLocation {
            lat: 51.4545,
            lng: -2.5879,
            display_name: "Bristol".to_string(),
        }),
        ..SearchFilters::default()
    }
}

/// Provider whose responses (delay + outcome) are scripted per call, in
/// submission order.
struct ScriptedProvider {
    script: Mutex<VecDeque<(Duration, Result<ProviderPage, String>)>>,
}

impl ScriptedProvider {
    fn new(script: Vec<(Duration, Result<ProviderPage, String>)>) -> Arc<Self> {
        Arc::new(Self { script: Mutex::new(script.into()) })
    }
}

#[async_trait]
impl EventProvider for ScriptedProvider {
    async fn search(&self, _query: &ProviderQuery) -> rave_radar::error::Result<ProviderPage> {
        let (delay, outcome) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted provider call");
        tokio::time::sleep(delay).await;
        outcome.map_err(|detail| RadarError::Provider { status: 500, detail })
    }
}

#[tokio::test]
async fn missing_location_fails_fast_without_touching_state() {
    let provider = ScriptedProvider::new(vec![]);
    let session = SearchSession::new(provider);

    let err = session
        .start_search(&SearchFilters::default(), today())
        .await
        .unwrap_err();
    assert!(matches!(err, RadarError::Validation(_)));

    let state = session.snapshot();
    assert!(!state.loading);
    assert!(state.events.is_empty());
    assert!(state.error.is_none());
}

#[tokio::test]
async fn successful_search_populates_state() {
    let provider = ScriptedProvider::new(vec![(Duration::ZERO, Ok(page("a")))]);
    let session = SearchSession::new(provider);

    session.start_search(&located_filters(), today()).await.unwrap();

    let state = session.snapshot();
    assert!(!state.loading);
    assert_eq!(state.total, 1);
    assert_eq!(state.events[0].id, "a");
    assert!(state.error.is_none());
}

#[tokio::test]
async fn newer_search_wins_even_when_older_response_arrives_last() {
    // Search A answers slowly, search B quickly: B's response lands first,
    // A's arrives later and must be discarded.
    let provider = ScriptedProvider::new(vec![
        (Duration::from_millis(80), Ok(page("a"))),
        (Duration::from_millis(10), Ok(page("b"))),
    ]);
    let session = Arc::new(SearchSession::new(provider));

    let first = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.start_search(&located_filters(), today()).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.start_search(&located_filters(), today()).await })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let state = session.snapshot();
    assert!(!state.loading);
    assert_eq!(state.events.len(), 1);
    assert_eq!(state.events[0].id, "b", "stale response must never overwrite the newer one");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn burst_of_overlapping_searches_settles_on_the_last_issued() {
    // Every older call answers slower than every newer one, so all stale
    // responses arrive after the winner has already written its result. No
    // matter how the runtime interleaves the completions, the state must
    // reflect the last issued search only.
    let count = 8usize;
    let script: Vec<_> = (0..count)
        .map(|i| {
            let delay = Duration::from_millis(15 * (count - i) as u64);
            (delay, Ok(page(&format!("s{i}"))))
        })
        .collect();
    let provider = ScriptedProvider::new(script);
    let session = Arc::new(SearchSession::new(provider));

    let mut handles = Vec::new();
    for _ in 0..count {
        let session = Arc::clone(&session);
        handles.push(tokio::spawn(async move {
            session.start_search(&located_filters(), today()).await
        }));
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let state = session.snapshot();
    assert!(!state.loading);
    assert_eq!(state.events.len(), 1);
    assert_eq!(state.events[0].id, format!("s{}", count - 1));
}

#[tokio::test]
async fn provider_failure_sets_error_but_keeps_previous_events() {
    let provider = ScriptedProvider::new(vec![
        (Duration::ZERO, Ok(page("a"))),
        (Duration::ZERO, Err("boom".to_string())),
    ]);
    let session = SearchSession::new(provider);

    session.start_search(&located_filters(), today()).await.unwrap();
    session.start_search(&located_filters(), today()).await.unwrap();

    let state = session.snapshot();
    assert!(!state.loading);
    assert!(state.error.is_some());
    // Previous results stay visible behind the error message.
    assert_eq!(state.events[0].id, "a");
}

#[tokio::test]
async fn debounced_edits_coalesce_into_one_search() {
    // Only one call scripted: a second would panic.
    let provider = ScriptedProvider::new(vec![(Duration::ZERO, Ok(page("last")))]);
    let session = Arc::new(SearchSession::new(provider));
    let debounced = DebouncedSearch::with_window(Arc::clone(&session), Duration::from_millis(20));

    let mut last = None;
    for _ in 0..4 {
        last = Some(debounced.edit(located_filters(), today()));
        tokio::time::sleep(Duration::from_millis(3)).await;
    }
    last.unwrap().await.unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;

    let state = session.snapshot();
    assert_eq!(state.events.len(), 1);
    assert_eq!(state.events[0].id, "last");
}

/// Geocoder that resolves each query to a location named after it, after a
/// scripted delay.
struct ScriptedGeocoder {
    delays: Mutex<VecDeque<Duration>>,
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn geocode(&self, query: &str) -> rave_radar::error::Result<Option<GeocodedLocation>> {
        let delay = self.delays.lock().unwrap().pop_front().unwrap_or(Duration::ZERO);
        tokio::time::sleep(delay).await;
        Ok(Some(GeocodedLocation { lat: 0.0, lng: 0.0, display_name: query.to_string() }))
    }
}

#[tokio::test]
async fn location_flow_keeps_only_the_newest_resolution() {
    let geocoder = Arc::new(ScriptedGeocoder {
        delays: Mutex::new(VecDeque::from(vec![
            Duration::from_millis(60),
            Duration::from_millis(5),
        ])),
    });
    let flow = LocationFlow::with_window(geocoder, Duration::from_millis(5));

    let first = flow.edit("Brighton".to_string());
    tokio::time::sleep(Duration::from_millis(15)).await;
    let second = flow.edit("Bristol".to_string());

    first.await.unwrap();
    second.await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;

    let resolved = flow.resolved().expect("a location should have resolved");
    assert_eq!(resolved.display_name, "Bristol");
}
