use geo::Point;

use crate::error::Result;
use crate::geom::{PointIndex, haversine_km};
use crate::types::{Facility, FacilityTypes, PopulationPoint};

/// Check whether `point` lies within `radius_km` of `facility` (inclusive).
#[inline]
pub fn is_covered(point: Point<f64>, facility: Point<f64>, radius_km: f64) -> bool {
    haversine_km(point, facility) <= radius_km
}

/// Population covered by at least one facility, each facility using the radius of its type.
///
/// Points covered by several facilities are counted once. A facility whose type is not in
/// `types` is an error.
pub fn covered_population(points: &[PopulationPoint], facilities: &[Facility], types: &FacilityTypes) -> Result<f64> {
    let index = PointIndex::new(&points.iter().map(PopulationPoint::location).collect::<Vec<_>>());
    let mut covered = vec![false; points.len()];

    for facility in facilities {
        let radius = types.get(&facility.facility_type)?.coverage_radius_km;
        for idx in index.within(facility.location(), radius) {
            covered[idx] = true;
        }
    }

    Ok(points.iter().zip(&covered)
        .filter(|(_, covered)| **covered)
        .map(|(point, _)| point.weight())
        .sum())
}

/// Population points split by whether existing facilities already serve them.
#[derive(Debug, Clone, Default)]
pub struct ServiceSplit {
    /// Points outside every existing facility's reach, in input order.
    pub underserved: Vec<PopulationPoint>,
    /// Population already served by existing facilities.
    pub baseline_covered: f64,
}

/// Split points into under-served ones and the baseline-covered population.
///
/// The inclusion test is conservative: a point counts as served if any existing
/// facility lies within the largest radius in the catalog, whatever that facility's type.
pub fn underserved(points: &[PopulationPoint], existing: &[Facility], types: &FacilityTypes) -> ServiceSplit {
    underserved_within(points, existing, types.max_radius_km())
}

/// Split points by whether any facility lies within `radius_km`.
pub fn underserved_within(points: &[PopulationPoint], facilities: &[Facility], radius_km: f64) -> ServiceSplit {
    let index = PointIndex::new(&facilities.iter().map(Facility::location).collect::<Vec<_>>());

    let mut split = ServiceSplit::default();
    for point in points {
        if index.any_within(point.location(), radius_km) {
            split.baseline_covered += point.weight();
        } else {
            split.underserved.push(point.clone());
        }
    }
    split
}

/// Incremental coverage bookkeeping over a fixed set of points.
///
/// Tracks which points are already served so marginal gains never count a point twice.
#[derive(Debug, Clone)]
pub struct CoverageTracker<'a> {
    points: &'a [PopulationPoint],
    index: PointIndex,
    covered: Vec<bool>,
    covered_population: f64,
}

impl<'a> CoverageTracker<'a> {
    /// Start with no point covered.
    pub fn new(points: &'a [PopulationPoint]) -> Self {
        Self {
            index: PointIndex::new(&points.iter().map(PopulationPoint::location).collect::<Vec<_>>()),
            covered: vec![false; points.len()],
            covered_population: 0.0,
            points,
        }
    }

    /// Population covered so far.
    #[inline] pub fn covered_population(&self) -> f64 { self.covered_population }

    /// Number of points covered so far.
    #[inline] pub fn covered_count(&self) -> usize { self.covered.iter().filter(|c| **c).count() }

    /// Check whether the point at `idx` is already covered.
    #[inline] pub fn is_covered(&self, idx: usize) -> bool { self.covered[idx] }

    /// Population that a facility at `location` with `radius_km` would newly cover.
    pub fn marginal_gain(&self, location: Point<f64>, radius_km: f64) -> f64 {
        self.index.within(location, radius_km).into_iter()
            .filter(|&idx| !self.covered[idx])
            .map(|idx| self.points[idx].weight())
            .sum()
    }

    /// Mark everything within `radius_km` of `location` as covered; returns the newly covered indices.
    pub fn cover(&mut self, location: Point<f64>, radius_km: f64) -> Vec<usize> {
        let newly = self.index.within(location, radius_km).into_iter()
            .filter(|&idx| !self.covered[idx])
            .collect::<Vec<_>>();
        for &idx in &newly {
            self.covered[idx] = true;
            self.covered_population += self.points[idx].weight();
        }
        newly
    }
}
