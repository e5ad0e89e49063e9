//! Static lookup tables: the genre taxonomy (canonical name, short share
//! code, provider keyword expansion) and the city preset table used by the
//! share codec. Each table is defined exactly once here and injected wherever
//! it is needed; nothing redefines them downstream.

/// One genre taxonomy row. `key` is the canonical lowercase name filters use,
/// `display` the user-facing name, `code` the short share-token code and
/// `keywords` the provider full-text OR-clause the genre expands to.
#[derive(Debug, Clone, Copy)]
pub struct GenreEntry {
    pub key: &'static str,
    pub display: &'static str,
    pub code: &'static str,
    pub keywords: &'static str,
}

/// The genre taxonomy in canonical order. Share-token genre codes are always
/// emitted in this order, regardless of selection order.
pub const GENRES: &[GenreEntry] = &[
    GenreEntry { key: "drum & bass", display: "Drum & Bass", code: "DNB", keywords: "drum and bass OR dnb" },
    GenreEntry { key: "jungle", display: "Jungle", code: "JNG", keywords: "jungle" },
    GenreEntry { key: "techno", display: "Techno", code: "TNO", keywords: "techno OR hard techno OR industrial" },
    GenreEntry { key: "garage", display: "Garage", code: "UKG", keywords: "garage OR ukg OR bassline" },
    GenreEntry { key: "trance", display: "Trance", code: "TRN", keywords: "trance OR psytrance" },
    GenreEntry { key: "hard dance", display: "Hard Dance", code: "HRD", keywords: "hardstyle OR hardcore OR gabber" },
    GenreEntry { key: "dubstep", display: "Dubstep", code: "DUB", keywords: "dubstep" },
    GenreEntry { key: "house", display: "House", code: "HSE", keywords: "house OR deep house OR tech house" },
];

/// Broad fallback clause covering the whole supported genre space. Used when
/// no selected genre matches the taxonomy, so a search never narrows to
/// nothing by accident.
pub const DEFAULT_KEYWORD: &str =
    "rave OR techno OR drum and bass OR dnb OR jungle OR garage OR hardstyle OR trance OR house OR dubstep";

/// Look up a taxonomy row by canonical name (case-insensitive).
pub fn genre_by_key(key: &str) -> Option<&'static GenreEntry> {
    let key = key.trim().to_lowercase();
    GENRES.iter().find(|g| g.key == key)
}

/// Look up a taxonomy row by share-token code.
pub fn genre_by_code(code: &str) -> Option<&'static GenreEntry> {
    GENRES.iter().find(|g| g.code == code)
}

/// A preset city the share codec can round-trip coordinates for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityPreset {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

/// Known city presets, keyed by uppercased name. Share tokens only carry a
/// location label; only these cities decode back to coordinates.
pub const CITY_PRESETS: &[CityPreset] = &[
    CityPreset { name: "LONDON", lat: 51.5074, lng: -0.1278 },
    CityPreset { name: "MANCHESTER", lat: 53.4808, lng: -2.2426 },
    CityPreset { name: "GLASGOW", lat: 55.8642, lng: -4.2518 },
    CityPreset { name: "BRISTOL", lat: 51.4545, lng: -2.5879 },
    CityPreset { name: "LEEDS", lat: 53.8008, lng: -1.5491 },
    CityPreset { name: "EDINBURGH", lat: 55.9533, lng: -3.1883 },
    CityPreset { name: "BIRMINGHAM", lat: 52.4862, lng: -1.8904 },
    CityPreset { name: "LIVERPOOL", lat: 53.4084, lng: -2.9916 },
];

/// Resolve an uppercased city key to its preset, if it is one we know.
pub fn city_preset(name: &str) -> Option<&'static CityPreset> {
    CITY_PRESETS.iter().find(|c| c.name == name)
}
