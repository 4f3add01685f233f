use std::collections::HashMap;

use moka::sync::Cache;

use crate::models::GeoCoordinate;

/// Resolves a free-text place name to coordinates.
///
/// The screening pipeline only depends on this trait, so the static lookup
/// below can be swapped for a live geocoding service without touching callers.
pub trait Geocoder: Send + Sync {
    fn resolve(&self, name: &str) -> Option<GeoCoordinate>;
}

/// Common tourism cities the static resolver knows about
const CITY_COORDINATES: &[(&str, f64, f64)] = &[
    ("venice", 45.4408, 12.3155),
    ("rome", 41.9028, 12.4964),
    ("florence", 43.7696, 11.2558),
    ("milan", 45.4642, 9.1900),
    ("naples", 40.8518, 14.2681),
    ("barcelona", 41.3851, 2.1734),
    ("madrid", 40.4168, -3.7038),
    ("paris", 48.8566, 2.3522),
    ("london", 51.5074, -0.1278),
    ("amsterdam", 52.3676, 4.9041),
    ("berlin", 52.5200, 13.4050),
    ("vienna", 48.2082, 16.3738),
    ("prague", 50.0755, 14.4378),
    ("lisbon", 38.7223, -9.1393),
    ("athens", 37.9838, 23.7275),
];

/// Geocoder backed by a static name -> coordinate table.
///
/// Both hits and misses are cached under the normalized name, so repeated
/// lookups for the same unresolved name cost O(1) after the first. Entries
/// are never invalidated within the process lifetime.
pub struct StaticGeocoder {
    table: HashMap<String, GeoCoordinate>,
    cache: Cache<String, Option<GeoCoordinate>>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        let table = CITY_COORDINATES
            .iter()
            .map(|(name, lat, lon)| ((*name).to_string(), GeoCoordinate::new(*lat, *lon)))
            .collect();
        Self::with_table(table)
    }

    pub fn with_table(table: HashMap<String, GeoCoordinate>) -> Self {
        Self {
            table,
            cache: Cache::new(10_000),
        }
    }
}

impl Default for StaticGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for StaticGeocoder {
    fn resolve(&self, name: &str) -> Option<GeoCoordinate> {
        if name.trim().is_empty() {
            return None;
        }

        let normalized = name.trim().to_lowercase();

        if let Some(cached) = self.cache.get(&normalized) {
            return cached;
        }

        let result = self.table.get(&normalized).copied();
        if result.is_none() {
            tracing::debug!("Geocode miss for '{}'", normalized);
        }
        self.cache.insert(normalized, result);
        result
    }
}
