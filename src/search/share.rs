//! Shareable permalink tokens: `RADAR/LOCATION/GENRECODE/<r>MI/DATECODE`.
//!
//! The location field is a display label, not a coordinate encoding: it only
//! decodes back to coordinates when it exactly matches the city preset table.
//! Free-text locations encode fine but decode to "no preset" — a known v1
//! asymmetry, kept on purpose until the token format grows a coordinate
//! field.

use crate::constants::{SHARE_LOCATION_PLACEHOLDER, SHARE_TAG};
use crate::domain::{DateRangeKind, SearchFilters};
use crate::search::query::{clamp_radius, clamp_radius_miles};
use crate::taxonomy::{city_preset, genre_by_code, CityPreset, GENRES};

/// Filter fields recovered from a decoded token.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedFilters {
    /// Uppercased location label as carried in the token.
    pub location_key: String,
    /// Coordinates, only when the label is a known preset city.
    pub preset: Option<&'static CityPreset>,
    pub radius: u32,
    /// Genre display names; unknown codes drop silently.
    pub genres: Vec<String>,
    pub date_range: DateRangeKind,
}

fn date_code(kind: DateRangeKind) -> &'static str {
    match kind {
        DateRangeKind::Tonight => "TNT",
        DateRangeKind::Weekend => "WKD",
        DateRangeKind::Next7 => "7D",
        DateRangeKind::Next14 => "14D",
        DateRangeKind::Custom => "CST",
    }
}

fn parse_date_code(code: &str) -> DateRangeKind {
    match code {
        "TNT" => DateRangeKind::Tonight,
        "WKD" => DateRangeKind::Weekend,
        "14D" => DateRangeKind::Next14,
        "CST" => DateRangeKind::Custom,
        _ => DateRangeKind::Next7,
    }
}

/// Genre codes in fixed taxonomy order, regardless of selection order.
fn genre_code(genres: &[String]) -> String {
    let selected: Vec<String> = genres.iter().map(|g| g.trim().to_lowercase()).collect();
    let codes: Vec<&str> = GENRES
        .iter()
        .filter(|entry| selected.iter().any(|g| g == entry.key))
        .map(|entry| entry.code)
        .collect();
    if codes.is_empty() {
        "ALL".to_string()
    } else {
        codes.join("+")
    }
}

/// Encode a filter set into a permalink token.
pub fn encode(filters: &SearchFilters) -> String {
    let label = filters
        .location
        .as_ref()
        .map(|l| l.display_name.trim())
        .filter(|l| !l.is_empty())
        .unwrap_or(SHARE_LOCATION_PLACEHOLDER);
    let location = label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase();

    format!(
        "{SHARE_TAG}/{location}/{}/{}MI/{}",
        genre_code(&filters.genres),
        clamp_radius_miles(filters.radius),
        date_code(filters.date_range),
    )
}

/// Decode a permalink token. A leading `#` is tolerated. Returns `None` on
/// wrong arity or a wrong leading tag; every field inside a well-formed token
/// degrades individually (bad radius → default, unknown genre codes drop,
/// unknown date code → default range).
pub fn decode(token: &str) -> Option<SharedFilters> {
    let parts: Vec<&str> = token.trim_start_matches('#').split('/').collect();
    if parts.len() < 5 || parts[0] != SHARE_TAG {
        return None;
    }

    let location_key = parts[1].replace('_', " ").to_uppercase();
    let preset = city_preset(&location_key);

    let genre_field = parts[2].to_uppercase();
    let genres = if genre_field.is_empty() || genre_field == "ALL" {
        Vec::new()
    } else {
        genre_field
            .split('+')
            .filter_map(|code| genre_by_code(code).map(|e| e.display.to_string()))
            .collect()
    };

    let radius_field = parts[3].to_uppercase();
    let radius = clamp_radius(radius_field.trim_end_matches("MI"));

    Some(SharedFilters {
        location_key,
        preset,
        radius,
        genres,
        date_range: parse_date_code(&parts[4].to_uppercase()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeocodedLocation;

    fn filters_for(city: &str, genres: &[&str], radius: u32, range: DateRangeKind) -> SearchFilters {
        SearchFilters {
            location: Some(GeocodedLocation {
                lat: 0.0,
                lng: 0.0,
                display_name: city.to_string(),
            }),
            radius,
            date_range: range,
            genres: genres.iter().map(|s| s.to_string()).collect(),
            ..SearchFilters::default()
        }
    }

    #[test]
    fn encodes_canonical_token() {
        let f = filters_for("Bristol", &["techno", "jungle"], 25, DateRangeKind::Weekend);
        assert_eq!(encode(&f), "RADAR/BRISTOL/JNG+TNO/25MI/WKD");
    }

    #[test]
    fn genre_codes_use_taxonomy_order_not_selection_order() {
        let a = filters_for("Leeds", &["house", "drum & bass"], 10, DateRangeKind::Tonight);
        let b = filters_for("Leeds", &["drum & bass", "house"], 10, DateRangeKind::Tonight);
        assert_eq!(encode(&a), encode(&b));
        assert_eq!(encode(&a), "RADAR/LEEDS/DNB+HSE/10MI/TNT");
    }

    #[test]
    fn empty_location_uses_placeholder() {
        let f = SearchFilters::default();
        assert_eq!(encode(&f), "RADAR/UK/ALL/25MI/7D");
    }

    #[test]
    fn round_trips_radius_genres_and_range_for_preset_cities() {
        let f = filters_for("Manchester", &["garage", "dubstep"], 60, DateRangeKind::Next14);
        let shared = decode(&encode(&f)).unwrap();
        assert_eq!(shared.radius, 60);
        assert_eq!(shared.date_range, DateRangeKind::Next14);
        assert_eq!(shared.genres, vec!["Garage", "Dubstep"]);
        let preset = shared.preset.unwrap();
        assert_eq!(preset.name, "MANCHESTER");
    }

    #[test]
    fn free_text_locations_encode_but_decode_to_no_preset() {
        let f = filters_for("Hebden Bridge", &[], 25, DateRangeKind::Next7);
        let token = encode(&f);
        assert_eq!(token, "RADAR/HEBDEN_BRIDGE/ALL/25MI/7D");
        let shared = decode(&token).unwrap();
        assert_eq!(shared.location_key, "HEBDEN BRIDGE");
        assert!(shared.preset.is_none());
    }

    #[test]
    fn rejects_wrong_tag_or_arity() {
        assert!(decode("SONAR/LONDON/ALL/25MI/7D").is_none());
        assert!(decode("RADAR/LONDON/ALL/25MI").is_none());
        assert!(decode("").is_none());
    }

    #[test]
    fn malformed_fields_degrade_instead_of_failing() {
        let shared = decode("#RADAR/LONDON/TNO+XYZ/banana/??").unwrap();
        assert_eq!(shared.genres, vec!["Techno"]);
        assert_eq!(shared.radius, 25);
        assert_eq!(shared.date_range, DateRangeKind::Next7);
        assert_eq!(shared.preset.unwrap().name, "LONDON");
    }
}
