//! Normalizes raw provider records into the canonical event shape.
//!
//! Provider payloads are heterogeneous and partial; each record either
//! survives the full validation ladder or is dropped. Drops are silent from
//! the caller's point of view but the count is carried on the batch result
//! and logged for diagnostics.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::constants::{DEFAULT_DOORS_OPEN, PROVIDER_HOME_URL, PROVIDER_NAME};
use crate::domain::{EventVenue, NormalizedEvent};

/// Raw Skiddle record, deserialized leniently. Only `id` and `eventname` are
/// structurally required; everything else is validated field by field.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub id: String,
    pub eventname: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub startdate: Option<String>,
    #[serde(default)]
    pub openingtimes: Option<RawOpeningTimes>,
    #[serde(default)]
    pub venue: Option<RawVenue>,
    #[serde(default)]
    pub entryprice: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<RawGenre>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOpeningTimes {
    #[serde(default)]
    pub doorsopen: Option<String>,
    #[serde(default)]
    pub doorsclose: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVenue {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGenre {
    pub name: String,
}

/// Result of normalizing one batch of raw records.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub events: Vec<NormalizedEvent>,
    /// Records rejected by the validation ladder (or unparseable outright).
    pub dropped: usize,
}

/// Skiddle sends coordinates as strings; tolerate numbers too.
fn finite_coord(v: Option<&Value>) -> Option<f64> {
    let n = match v? {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

/// Normalize one raw record, or reject it.
///
/// Rejection points, in order: no usable date field, then unparseable venue
/// coordinates. Everything after that defaults rather than rejects.
pub fn normalize(raw: &RawEvent) -> Option<NormalizedEvent> {
    let date = raw
        .date
        .clone()
        .filter(|d| !d.is_empty())
        .or_else(|| raw.startdate.clone().filter(|d| !d.is_empty()))?;

    let venue = raw.venue.as_ref();
    let lat = finite_coord(venue.and_then(|v| v.latitude.as_ref()))?;
    let lng = finite_coord(venue.and_then(|v| v.longitude.as_ref()))?;

    let times = raw.openingtimes.as_ref();
    let doors_open = times
        .and_then(|t| non_empty(t.doorsopen.clone()))
        .unwrap_or_else(|| DEFAULT_DOORS_OPEN.to_string());
    let doors_close = times.and_then(|t| non_empty(t.doorsclose.clone()));

    Some(NormalizedEvent {
        id: raw.id.clone(),
        provider: PROVIDER_NAME.to_string(),
        title: raw.eventname.clone(),
        start_date_time: format!("{date}T{doors_open}:00"),
        end_date_time: doors_close.map(|t| format!("{date}T{t}:00")),
        venue: EventVenue {
            name: venue
                .and_then(|v| non_empty(v.name.clone()))
                .unwrap_or_else(|| "TBA".to_string()),
            address: venue.and_then(|v| non_empty(v.address.clone())),
            city: venue.and_then(|v| non_empty(v.town.clone())),
            lat,
            lng,
        },
        price_text: non_empty(raw.entryprice.clone()).map(|p| format!("From £{p}")),
        link: non_empty(raw.link.clone()).unwrap_or_else(|| PROVIDER_HOME_URL.to_string()),
        genres: raw
            .genres
            .as_ref()
            .map(|gs| gs.iter().map(|g| g.name.clone()).collect())
            .unwrap_or_default(),
    })
}

/// Normalize a whole provider result page. Records that fail to deserialize
/// at all count as dropped alongside records the validation ladder rejects.
pub fn normalize_batch(raw: &[Value]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    for value in raw {
        let normalized = serde_json::from_value::<RawEvent>(value.clone())
            .ok()
            .as_ref()
            .and_then(normalize);
        match normalized {
            Some(event) => batch.events.push(event),
            None => batch.dropped += 1,
        }
    }
    if batch.dropped > 0 {
        debug!(dropped = batch.dropped, kept = batch.events.len(), "dropped malformed provider records");
    }
    batch
}
