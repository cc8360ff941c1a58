//! Great-circle distance between geographic coordinates.

use geo::{Distance, Haversine, Point};

/// Haversine distance in kilometres between two `(latitude, longitude)`
/// pairs given in degrees.
///
/// Uses the mean Earth radius. Any finite input is accepted.
///
/// # Examples
///
/// ```
/// use rideshare_ga::distance::haversine_km;
///
/// // One degree of longitude on the equator.
/// let d = haversine_km((0.0, 0.0), (0.0, 1.0));
/// assert!((d - 111.195).abs() < 0.01);
/// ```
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    // geo points are (x = longitude, y = latitude)
    let a = Point::new(from.1, from.0);
    let b = Point::new(to.1, to.0);
    Haversine.distance(a, b) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero() {
        assert_eq!(haversine_km((52.37, 4.89), (52.37, 4.89)), 0.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = (52.37, 4.89);
        let b = (48.85, 2.35);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Amsterdam to Paris is roughly 430 km as the crow flies.
        let d = haversine_km((52.3676, 4.9041), (48.8566, 2.3522));
        assert!(d > 425.0 && d < 435.0, "got {d}");
    }

    #[test]
    fn test_haversine_meridian_degree() {
        let d = haversine_km((0.0, 0.0), (1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01);
    }
}
