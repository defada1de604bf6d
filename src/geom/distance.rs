use geo::Point;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate length of one degree of latitude in kilometres.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle distance in kilometres between two `(lat, lon)` pairs given in degrees.
///
/// Total over all inputs: NaN coordinates yield NaN, which callers must guard against.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    // Rounding can push `a` a hair above 1 for antipodal points. `clamp` keeps NaN.
    2.0 * EARTH_RADIUS_KM * a.sqrt().clamp(0.0, 1.0).asin()
}

/// Great-circle distance in kilometres between two points stored as (lon, lat).
#[inline]
pub fn haversine_km(a: Point<f64>, b: Point<f64>) -> f64 {
    distance(a.y(), a.x(), b.y(), b.x())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        assert_eq!(distance(-6.5, 106.8, -6.5, 106.8), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = distance(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn symmetric() {
        let a = distance(-6.2088, 106.8456, -6.4815, 106.8540);
        let b = distance(-6.4815, 106.8540, -6.2088, 106.8456);
        assert!((a - b).abs() < 1e-12);
        assert!(a > 30.0 && a < 31.0, "got {a}");
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = distance(0.0, 0.0, 0.0, 180.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn nan_propagates() {
        assert!(distance(f64::NAN, 0.0, 0.0, 0.0).is_nan());
        assert!(distance(0.0, 0.0, 0.0, f64::NAN).is_nan());
        assert!(haversine_km(Point::new(f64::NAN, f64::NAN), Point::new(106.8, -6.5)).is_nan());
    }

    #[test]
    fn point_form_reads_lon_lat() {
        let a = Point::new(106.8456, -6.2088);
        let b = Point::new(106.8540, -6.4815);
        assert_eq!(haversine_km(a, b), distance(-6.2088, 106.8456, -6.4815, 106.8540));
    }
}
