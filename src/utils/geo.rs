//! Great-circle distance between two coordinates.

/// Mean Earth radius (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two (lat, lon) points in degrees
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = libm::pow(libm::sin(d_phi / 2.0), 2.0)
        + libm::cos(phi1) * libm::cos(phi2) * libm::pow(libm::sin(d_lambda / 2.0), 2.0);
    let c = 2.0 * libm::atan2(libm::sqrt(a), libm::sqrt(1.0 - a));

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_distance() {
        assert_relative_eq!(haversine_km(15.0, 75.0, 15.0, 75.0), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // ~111.19 km everywhere
        assert_relative_eq!(haversine_km(10.0, 76.0, 11.0, 76.0), 111.19, epsilon = 0.05);
    }

    #[test]
    fn test_symmetric() {
        let a = haversine_km(12.9716, 77.5946, 26.2389, 73.0243);
        let b = haversine_km(26.2389, 73.0243, 12.9716, 77.5946);
        assert_relative_eq!(a, b, epsilon = 1e-9);
        assert!(a > 1400.0 && a < 1600.0);
    }
}
