// Distance calculation utilities

use crate::models::{GeoPoint, Km};
use geo::{GeodesicDistance, Point};

/// Great-circle distance between two points in kilometers.
///
/// Uses the geodesic on the WGS-84 ellipsoid, so it is exact enough to serve
/// both as the base of the cost model and as the search heuristic.
pub fn great_circle_km(a: &GeoPoint, b: &GeoPoint) -> Km {
    if a == b {
        return 0.0;
    }
    // geo points are (x = longitude, y = latitude)
    let p1 = Point::new(a.longitude, a.latitude);
    let p2 = Point::new(b.longitude, b.latitude);
    p1.geodesic_distance(&p2) / 1000.0
}

/// Total length of a path as the sum of its segment distances
pub fn path_length_km(path: &[GeoPoint]) -> Km {
    path.windows(2)
        .map(|segment| great_circle_km(&segment[0], &segment[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_great_circle_distance() {
        // Trivandrum to Kochi is roughly 160 km as the crow flies
        let trivandrum = GeoPoint::new(8.5241, 76.9366);
        let kochi = GeoPoint::new(9.9312, 76.2673);
        let d = great_circle_km(&trivandrum, &kochi);

        assert!(d > 150.0 && d < 180.0, "unexpected distance {}", d);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(12.9716, 77.5946);
        let b = GeoPoint::new(13.0827, 80.2707);

        assert!((great_circle_km(&a, &b) - great_circle_km(&b, &a)).abs() < 1e-9);
    }

    #[test]
    fn test_path_length() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let c = GeoPoint::new(0.0, 2.0);

        let total = path_length_km(&[a, b, c]);
        assert!((total - great_circle_km(&a, &c)).abs() < 1e-6);
        assert_eq!(path_length_km(&[a]), 0.0);
        assert_eq!(path_length_km(&[]), 0.0);
    }
}
