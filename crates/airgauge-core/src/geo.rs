//! Great-circle distance between coordinates.

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two `(lat, lon)` points in degrees.
///
/// # Example
///
/// ```
/// use airgauge_core::geo::distance_km;
///
/// // One degree of latitude is roughly 111 km.
/// let d = distance_km(40.0, 44.5, 41.0, 44.5);
/// assert!((d - 111.19).abs() < 0.01);
/// ```
#[must_use]
pub fn distance_km(a_lat: f64, a_lon: f64, b_lat: f64, b_lon: f64) -> f64 {
    let d_lat = (b_lat - a_lat).to_radians();
    let d_lon = (b_lon - a_lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + a_lat.to_radians().cos() * b_lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
