use geo::Point;
use serde::{Deserialize, Serialize};

/// Population mass (e.g. a village) at a coordinate, tagged with its sub-area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationPoint {
    pub id: String,
    pub population_count: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub sub_area_id: String,
}

impl PopulationPoint {
    pub fn new(id: impl Into<String>, population_count: f64, latitude: f64, longitude: f64, sub_area_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            population_count,
            latitude,
            longitude,
            sub_area_id: sub_area_id.into(),
        }
    }

    /// Location as a `geo` point (lon, lat).
    #[inline] pub fn location(&self) -> Point<f64> { Point::new(self.longitude, self.latitude) }

    /// Population weight usable in sums: negative or non-finite counts contribute nothing.
    #[inline]
    pub fn weight(&self) -> f64 {
        if self.population_count.is_finite() && self.population_count > 0.0 { self.population_count } else { 0.0 }
    }
}

/// Total population weight of a set of points.
pub fn total_population(points: &[PopulationPoint]) -> f64 {
    points.iter().map(PopulationPoint::weight).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_is_lon_lat() {
        let point = PopulationPoint::new("p1", 100.0, -6.5, 106.8, "sd1");
        assert_eq!(point.location().x(), 106.8);
        assert_eq!(point.location().y(), -6.5);
    }

    #[test]
    fn weight_ignores_invalid_counts() {
        assert_eq!(PopulationPoint::new("a", -5.0, 0.0, 0.0, "s").weight(), 0.0);
        assert_eq!(PopulationPoint::new("b", f64::NAN, 0.0, 0.0, "s").weight(), 0.0);
        assert_eq!(PopulationPoint::new("c", 12.5, 0.0, 0.0, "s").weight(), 12.5);
    }

    #[test]
    fn total_population_sums_weights() {
        let points = vec![
            PopulationPoint::new("a", 100.0, 0.0, 0.0, "s"),
            PopulationPoint::new("b", 250.0, 0.0, 0.0, "s"),
            PopulationPoint::new("c", -1.0, 0.0, 0.0, "s"),
        ];
        assert_eq!(total_population(&points), 350.0);
        assert_eq!(total_population(&[]), 0.0);
    }
}
