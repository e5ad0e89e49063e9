//! Shared constants for the search pipeline and the HTTP surface.

/// Canonical provider identifier stamped onto every normalized event.
pub const PROVIDER_NAME: &str = "skiddle";

/// Fallback event link when the provider record carries none.
pub const PROVIDER_HOME_URL: &str = "https://www.skiddle.com/";

/// Skiddle events search endpoint.
pub const SKIDDLE_SEARCH_URL: &str = "https://www.skiddle.com/api/v1/events/search/";

/// Nominatim search endpoint used for address lookups.
pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// User agent sent to the geocoding service.
pub const GEOCODER_USER_AGENT: &str = "rave-radar/0.1";

/// Radius clamp bounds and default, in miles.
pub const MIN_RADIUS_MILES: u32 = 1;
pub const MAX_RADIUS_MILES: u32 = 250;
pub const DEFAULT_RADIUS_MILES: u32 = 25;

/// Doors-open time assumed when the provider omits one.
pub const DEFAULT_DOORS_OPEN: &str = "23:00";

/// Maximum results requested from the provider per search.
pub const PROVIDER_RESULT_LIMIT: u32 = 50;

/// Quiescence window before a filter edit actually fires a search.
pub const SEARCH_DEBOUNCE_MS: u64 = 450;

/// Quiescence window for free-text location geocoding (shorter: it feeds
/// the search flow rather than racing it).
pub const GEOCODE_DEBOUNCE_MS: u64 = 250;

/// Leading tag of the shareable permalink token.
pub const SHARE_TAG: &str = "RADAR";

/// Location field placeholder when no location label is set.
pub const SHARE_LOCATION_PLACEHOLDER: &str = "UK";

/// Cache lifetimes for the two public endpoints, in seconds.
pub const EVENTS_CACHE_MAX_AGE: u32 = 30;
pub const GEOCODE_CACHE_MAX_AGE: u32 = 86_400;
