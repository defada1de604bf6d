use geo::{BoundingRect, Coord, MultiPoint, Point, Rect};
use serde::{Deserialize, Serialize};

use crate::geom::distance::KM_PER_DEGREE;

/// An axis-aligned latitude/longitude box, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Construct a box from two opposite corners, in any order.
    pub fn new(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Self {
        Self::from(Rect::new(Coord { x: lon1, y: lat1 }, Coord { x: lon2, y: lat2 }))
    }

    /// Smallest box containing every point (stored as lon, lat), or `None` if there are none.
    pub fn from_points(points: impl IntoIterator<Item = Point<f64>>) -> Option<Self> {
        MultiPoint::from_iter(points).bounding_rect().map(Self::from)
    }

    #[inline] pub fn lat_span(&self) -> f64 { self.max_lat - self.min_lat }

    #[inline] pub fn lon_span(&self) -> f64 { self.max_lon - self.min_lon }

    /// Check whether a point (lon, lat) lies inside or on the edge of the box.
    #[inline]
    pub fn contains(&self, point: Point<f64>) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.y())
            && (self.min_lon..=self.max_lon).contains(&point.x())
    }

    /// Grow the box by at least `margin_km` on every side.
    pub fn expand_km(&self, margin_km: f64) -> Self {
        let d_lat = margin_km.max(0.0) / KM_PER_DEGREE;
        let max_abs_lat = self.min_lat.abs().max(self.max_lat.abs()) + d_lat;
        let (min_lon, max_lon) = if max_abs_lat >= 89.0 {
            (-180.0, 180.0)
        } else {
            let d_lon = d_lat / max_abs_lat.to_radians().cos();
            (self.min_lon - d_lon, self.max_lon + d_lon)
        };
        Self {
            min_lat: self.min_lat - d_lat,
            min_lon,
            max_lat: self.max_lat + d_lat,
            max_lon,
        }
    }

    /// Number of grid steps of `step` degrees needed to cover a span (at least one).
    fn steps(span: f64, step: f64) -> usize {
        ((span / step).ceil() as usize).max(1)
    }

    /// Grid dimensions `(rows, cols)` for a square grid of `step` degrees.
    pub fn grid_shape(&self, step: f64) -> (usize, usize) {
        (Self::steps(self.lat_span(), step), Self::steps(self.lon_span(), step))
    }

    /// Iterate over grid cell centres (lon, lat), row-major from south-west to north-east.
    pub fn cell_centers(&self, step: f64) -> impl Iterator<Item = Point<f64>> + '_ {
        let (rows, cols) = self.grid_shape(step);
        (0..rows).flat_map(move |row| {
            let lat = self.min_lat + (row as f64 + 0.5) * step;
            (0..cols).map(move |col| Point::new(self.min_lon + (col as f64 + 0.5) * step, lat))
        })
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            min_lat: rect.min().y,
            min_lon: rect.min().x,
            max_lat: rect.max().y,
            max_lon: rect.max().x,
        }
    }
}
