use crate::models::GeoCoordinate;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the great-circle (Haversine) distance between two points
///
/// # Arguments
/// * `from` - First point in WGS84 degrees
/// * `to` - Second point in WGS84 degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(from: GeoCoordinate, to: GeoCoordinate) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
