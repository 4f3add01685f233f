use crate::core::distance::haversine_distance;
use crate::models::{Candidate, GeoCoordinate};
use crate::services::Geocoder;

/// Keep candidates within `radius_km` of the target point.
///
/// A candidate's position comes from its explicit coordinates when present,
/// else from geocoding its free-text location. Candidates with no resolvable
/// position are treated as infinitely distant and dropped. Survivors are
/// annotated with the computed distance.
pub fn filter_by_proximity(
    candidates: Vec<Candidate>,
    target: GeoCoordinate,
    radius_km: f64,
    geocoder: &dyn Geocoder,
) -> Vec<Candidate> {
    if candidates.is_empty() {
        return candidates;
    }

    let before = candidates.len();

    let kept: Vec<Candidate> = candidates
        .into_iter()
        .filter_map(|mut candidate| {
            let position = resolve_position(&candidate, geocoder)?;
            let distance = haversine_distance(target, position);
            if distance <= radius_km {
                candidate.distance_km = Some(distance);
                Some(candidate)
            } else {
                None
            }
        })
        .collect();

    tracing::info!(
        "Proximity filter: {} -> {} products (within {}km)",
        before,
        kept.len(),
        radius_km
    );

    kept
}

fn resolve_position(candidate: &Candidate, geocoder: &dyn Geocoder) -> Option<GeoCoordinate> {
    if let Some(coords) = candidate.unit.coordinates() {
        return Some(coords);
    }

    candidate
        .unit
        .location
        .as_deref()
        .filter(|location| !location.trim().is_empty())
        .and_then(|location| geocoder.resolve(location))
}
