//! Domain data shapes shared across the search core, the API clients and the
//! HTTP surface.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_RADIUS_MILES;

/// A geocoded location: coordinates plus the human-readable label the
/// geocoder resolved the free-text query to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedLocation {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
}

/// Symbolic date-range selector. `Custom` carries its bounds in
/// [`SearchFilters::custom_start`] / [`SearchFilters::custom_end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRangeKind {
    Tonight,
    Weekend,
    #[default]
    #[serde(rename = "7days")]
    Next7,
    #[serde(rename = "14days")]
    Next14,
    Custom,
}

impl DateRangeKind {
    /// Lenient parse of the user-facing selector names. Anything
    /// unrecognized falls back to the default 7-day range rather than
    /// erroring.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "tonight" => Self::Tonight,
            "weekend" => Self::Weekend,
            "14days" => Self::Next14,
            "custom" => Self::Custom,
            _ => Self::Next7,
        }
    }
}

/// One user-editable filter set. Owned by the caller and passed by value into
/// the core on each search; the core never holds onto it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Absent until the location input has been geocoded.
    pub location: Option<GeocodedLocation>,
    pub radius: u32,
    pub date_range: DateRangeKind,
    pub custom_start: Option<NaiveDate>,
    pub custom_end: Option<NaiveDate>,
    /// Canonical genre names drawn from the taxonomy; order-insignificant.
    pub genres: Vec<String>,
    /// Free-text keyword; empty means "no user keyword".
    pub keyword: String,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            location: None,
            radius: DEFAULT_RADIUS_MILES,
            date_range: DateRangeKind::default(),
            custom_start: None,
            custom_end: None,
            genres: Vec::new(),
            keyword: String::new(),
        }
    }
}

/// Venue as it appears on a normalized event. Coordinates are always finite;
/// records without parseable coordinates never make it this far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventVenue {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

/// Canonical event shape every provider record is reduced to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    /// Provider-assigned id, unique within one result set.
    pub id: String,
    pub provider: String,
    pub title: String,
    /// Combined date+time, `YYYY-MM-DDTHH:MM:SS`.
    pub start_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date_time: Option<String>,
    pub venue: EventVenue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_text: Option<String>,
    pub link: String,
    /// Provider genre tags, in provider order; possibly empty.
    pub genres: Vec<String>,
}

/// Concrete provider search request derived from one filter set.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_miles: u32,
    /// Disjunctive boolean-OR keyword expression (see `search::query`).
    pub keyword: String,
    /// Absent bounds are omitted from the upstream request, not defaulted.
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}
