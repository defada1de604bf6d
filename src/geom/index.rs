use geo::Point;
use rstar::{RTree, RTreeObject, AABB};

use crate::geom::distance::{EARTH_RADIUS_KM, haversine_km};

/// Kilometres per degree of arc on the model sphere.
const KM_PER_ARC_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// A point in an R-tree, associated with an input location by index.
#[derive(Debug, Clone)]
struct IndexedPoint {
    idx: usize, // Index of corresponding location in `PointIndex::points`
    coords: [f64; 2], // (lon, lat)
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coords)
    }
}

/// Spatial index over a fixed set of (lon, lat) locations answering great-circle radius queries.
///
/// The R-tree is queried with a degree envelope that always contains the search circle,
/// then candidates are filtered by exact Haversine distance.
#[derive(Debug, Clone)]
pub struct PointIndex {
    points: Vec<Point<f64>>,
    rtree: RTree<IndexedPoint>,
}

impl PointIndex {
    /// Build an index over `points`. Non-finite locations are kept for indexing
    /// purposes but never match a query.
    pub fn new(points: &[Point<f64>]) -> Self {
        Self {
            rtree: RTree::bulk_load(
                points.iter().enumerate()
                    .filter(|(_, p)| p.x().is_finite() && p.y().is_finite())
                    .map(|(idx, p)| IndexedPoint { idx, coords: [p.x(), p.y()] })
                    .collect()
            ),
            points: points.to_vec(),
        }
    }

    /// Get the number of indexed locations.
    #[inline] pub fn len(&self) -> usize { self.points.len() }

    /// Check if the index holds no locations.
    #[inline] pub fn is_empty(&self) -> bool { self.points.is_empty() }

    /// Get the location stored at `idx`.
    #[inline] pub fn point(&self, idx: usize) -> Point<f64> { self.points[idx] }

    /// Degree envelope containing every location within `radius_km` of `center`.
    fn envelope(center: Point<f64>, radius_km: f64) -> AABB<[f64; 2]> {
        let (lon, lat) = (center.x(), center.y());
        let d_lat = radius_km / KM_PER_ARC_DEGREE * 1.01 + 1e-9;

        let max_abs_lat = lat.abs() + d_lat;
        let d_lon = if max_abs_lat >= 89.0 {
            f64::INFINITY
        } else {
            d_lat / max_abs_lat.to_radians().cos()
        };

        // Near the poles or across the antimeridian, fall back to the full longitude range.
        let (min_lon, max_lon) = if lon - d_lon < -180.0 || lon + d_lon > 180.0 {
            (f64::MIN, f64::MAX)
        } else {
            (lon - d_lon, lon + d_lon)
        };

        AABB::from_corners([min_lon, lat - d_lat], [max_lon, lat + d_lat])
    }

    /// Indices of all locations within `radius_km` (inclusive) of `center`, in ascending order.
    pub fn within(&self, center: Point<f64>, radius_km: f64) -> Vec<usize> {
        if !(radius_km >= 0.0) || !center.x().is_finite() || !center.y().is_finite() {
            return Vec::new();
        }

        let mut found = self.rtree
            .locate_in_envelope_intersecting(&Self::envelope(center, radius_km))
            .filter(|item| haversine_km(center, self.points[item.idx]) <= radius_km)
            .map(|item| item.idx)
            .collect::<Vec<_>>();
        found.sort_unstable();
        found
    }

    /// Check whether any location lies within `radius_km` of `center`.
    pub fn any_within(&self, center: Point<f64>, radius_km: f64) -> bool {
        if !(radius_km >= 0.0) || !center.x().is_finite() || !center.y().is_finite() {
            return false;
        }

        self.rtree
            .locate_in_envelope_intersecting(&Self::envelope(center, radius_km))
            .any(|item| haversine_km(center, self.points[item.idx]) <= radius_km)
    }

    /// Nearest location to `center` and its distance in km. Ties keep the lowest index.
    pub fn nearest(&self, center: Point<f64>) -> Option<(usize, f64)> {
        self.points.iter().enumerate()
            .map(|(idx, &p)| (idx, haversine_km(center, p)))
            .filter(|(_, d)| !d.is_nan())
            .fold(None, |best, (idx, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((idx, d)),
            })
    }
}
