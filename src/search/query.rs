//! Builds a provider search query from one filter set: radius clamping plus
//! genre-to-keyword expansion.

use crate::constants::{DEFAULT_RADIUS_MILES, MAX_RADIUS_MILES, MIN_RADIUS_MILES};
use crate::domain::{GeocodedLocation, ProviderQuery, SearchFilters};
use crate::search::dates::DateBounds;
use crate::taxonomy::{genre_by_key, DEFAULT_KEYWORD};

/// Parse and clamp a raw radius value. Unparseable or non-finite input falls
/// back to the default; everything else is rounded to the nearest integer and
/// clamped to the supported range.
pub fn clamp_radius(raw: &str) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => {
            (n.round().max(MIN_RADIUS_MILES as f64).min(MAX_RADIUS_MILES as f64)) as u32
        }
        _ => DEFAULT_RADIUS_MILES,
    }
}

/// Clamp an already-numeric radius.
pub fn clamp_radius_miles(miles: u32) -> u32 {
    miles.clamp(MIN_RADIUS_MILES, MAX_RADIUS_MILES)
}

/// Expand selected genres (and an optional user keyword) into the provider's
/// boolean-OR full-text expression.
///
/// Genres that match the taxonomy contribute their expansion clause; if none
/// match — including the no-genres case — the broad default clause stands in,
/// so the expression never narrows to nothing. A non-empty user keyword is
/// prepended, OR-joined: the user's term is never sent alone, it always
/// degrades to the genre/default set as a fallback. Recall over precision.
pub fn build_keyword(genres: &[String], user_keyword: &str) -> String {
    let parts: Vec<&str> = genres
        .iter()
        .filter_map(|g| genre_by_key(g).map(|e| e.keywords))
        .collect();

    let mut built = if parts.is_empty() {
        DEFAULT_KEYWORD.to_string()
    } else {
        parts.join(" OR ")
    };

    let user = user_keyword.trim();
    if !user.is_empty() {
        built = format!("{user} OR {built}");
    }

    built
}

/// Derive the concrete provider query for a filter set whose location has
/// already been geocoded and whose date bounds have been resolved.
pub fn build_query(
    location: &GeocodedLocation,
    filters: &SearchFilters,
    bounds: DateBounds,
) -> ProviderQuery {
    ProviderQuery {
        lat: location.lat,
        lng: location.lng,
        radius_miles: clamp_radius_miles(filters.radius),
        keyword: build_keyword(&filters.genres, &filters.keyword),
        min_date: Some(bounds.min_date),
        max_date: Some(bounds.max_date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_falls_back_on_garbage() {
        assert_eq!(clamp_radius("abc"), 25);
        assert_eq!(clamp_radius(""), 25);
        assert_eq!(clamp_radius("NaN"), 25);
        assert_eq!(clamp_radius("inf"), 25);
    }

    #[test]
    fn radius_rounds_and_clamps() {
        assert_eq!(clamp_radius("999"), 250);
        assert_eq!(clamp_radius("0"), 1);
        assert_eq!(clamp_radius("-40"), 1);
        assert_eq!(clamp_radius("24.6"), 25);
        assert_eq!(clamp_radius("100"), 100);
    }

    #[test]
    fn no_genres_no_keyword_uses_default_clause() {
        let first = build_keyword(&[], "");
        assert_eq!(first, crate::taxonomy::DEFAULT_KEYWORD);
        // Pure function of its input.
        assert_eq!(build_keyword(&[], ""), first);
    }

    #[test]
    fn unmatched_genres_fall_back_to_default_clause() {
        let kw = build_keyword(&["polka".to_string()], "");
        assert_eq!(kw, crate::taxonomy::DEFAULT_KEYWORD);
    }

    #[test]
    fn matched_genres_join_with_or() {
        let kw = build_keyword(&["techno".to_string(), "jungle".to_string()], "");
        assert_eq!(kw, "techno OR hard techno OR industrial OR jungle");
    }

    #[test]
    fn user_keyword_is_prepended_never_alone() {
        let kw = build_keyword(&["techno".to_string()], "acid");
        assert!(kw.starts_with("acid OR "));
        assert!(kw.ends_with("techno OR hard techno OR industrial"));

        let kw = build_keyword(&[], "acid");
        assert_eq!(kw, format!("acid OR {}", crate::taxonomy::DEFAULT_KEYWORD));
    }

    #[test]
    fn blank_user_keyword_is_ignored() {
        assert_eq!(build_keyword(&[], "   "), crate::taxonomy::DEFAULT_KEYWORD);
    }
}
