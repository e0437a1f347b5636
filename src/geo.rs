//! Great-circle distance over the WGS84 mean Earth radius.

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance in meters between two (lat, lon) points given in degrees.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_same_point() {
        assert_eq!(distance_meters(55.7558, 37.6173, 55.7558, 37.6173), 0.0);
    }

    #[test]
    fn known_distance_moscow_to_spb() {
        // Moscow center to St. Petersburg center is ~634 km.
        let d = distance_meters(55.7558, 37.6173, 59.9343, 30.3351);
        assert!((d - 634_000.0).abs() < 5_000.0, "got {}", d);
    }

    #[test]
    fn small_offsets_scale_linearly() {
        // One degree of latitude is ~111.2 km regardless of longitude.
        let d = distance_meters(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);

        let d = distance_meters(55.7558, 37.6173, 55.7558 + 0.0009, 37.6173);
        assert!((d - 100.0).abs() < 1.0, "got {}", d);
    }
}
