use geo::Point;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PlanError, Result, require_positive};
use crate::geom::{BoundingBox, KM_PER_DEGREE, PointIndex, haversine_km};
use crate::heatmap::cell::{Heatmap, HeatmapCell, NO_FACILITY_DISTANCE_KM};
use crate::types::{Facility, PopulationPoint, total_population};

/// Cells with access below this are kept by the aggressive filter regardless of population.
const UNDERSERVED_ACCESS: f64 = 0.8;

/// A partially served cell is kept by the aggressive filter if a point lies this close, in km.
const NEARBY_POPULATION_KM: f64 = 3.0;

/// Grid parameters of one heatmap request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapOptions {
    /// Cell edge in degrees, for both latitude and longitude.
    pub grid_size_deg: f64,
    pub service_radius_km: f64,
    pub aggressive_filtering: bool,
    /// Upper bound on the number of evaluated cells.
    pub max_cells: usize,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self { grid_size_deg: 0.01, service_radius_km: 5.0, aggressive_filtering: true, max_cells: 250_000 }
    }
}

impl HeatmapOptions {
    pub fn new(service_radius_km: f64, aggressive_filtering: bool) -> Self {
        Self { service_radius_km, aggressive_filtering, ..Self::default() }
    }

    pub fn with_grid_size(mut self, grid_size_deg: f64) -> Self {
        self.grid_size_deg = grid_size_deg;
        self
    }

    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("grid_size_deg", self.grid_size_deg)?;
        require_positive("service_radius_km", self.service_radius_km)?;
        Ok(())
    }

    /// Radius of the density kernel: two cell widths, in km.
    #[inline] fn search_radius_km(&self) -> f64 { 2.0 * self.grid_size_deg * KM_PER_DEGREE }

    /// Nominal cell area in km².
    #[inline] fn cell_area_km2(&self) -> f64 { (self.grid_size_deg * KM_PER_DEGREE).powi(2) }
}

/// Access score for a facility `distance_km` away: 1 within the radius, 0 at twice the radius.
pub fn access_score(distance_km: f64, service_radius_km: f64) -> f64 {
    let score = if distance_km <= service_radius_km {
        1.0
    } else {
        1.0 - (distance_km - service_radius_km) / service_radius_km
    };
    if score.is_finite() { score.clamp(0.0, 1.0) } else { 0.0 }
}

#[inline]
fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() { value } else { default }
}

/// Rasterizes a bounding box into population density and facility access cells.
#[derive(Debug, Clone)]
pub struct HeatmapGridGenerator {
    options: HeatmapOptions,
}

impl HeatmapGridGenerator {
    pub fn new(options: HeatmapOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    #[inline] pub fn options(&self) -> &HeatmapOptions { &self.options }

    /// Build the heatmap over `bounding_box`, or over the bounding box of `points` if none is given.
    pub fn generate(
        &self,
        points: &[PopulationPoint],
        facilities: &[Facility],
        bounding_box: Option<BoundingBox>,
    ) -> Result<Heatmap> {
        let radius = self.options.service_radius_km;
        let derived = || BoundingBox::from_points(points.iter()
            .filter(|p| p.latitude.is_finite() && p.longitude.is_finite())
            .map(PopulationPoint::location));

        let Some(bbox) = bounding_box.or_else(derived) else {
            debug!("no population points, heatmap is empty");
            return Ok(Heatmap::empty(radius));
        };
        for (name, value) in [("min_lat", bbox.min_lat), ("min_lon", bbox.min_lon), ("max_lat", bbox.max_lat), ("max_lon", bbox.max_lon)] {
            if !value.is_finite() {
                return Err(PlanError::InvalidParameter { name, value });
            }
        }
        if points.is_empty() {
            return Ok(Heatmap::empty(radius));
        }

        let step = self.options.grid_size_deg;
        let (rows, cols) = bbox.grid_shape(step);
        let cells = rows.saturating_mul(cols);
        if cells > self.options.max_cells {
            return Err(PlanError::GridTooLarge { cells, max: self.options.max_cells });
        }

        let point_index = PointIndex::new(&points.iter().map(PopulationPoint::location).collect::<Vec<_>>());
        let facility_index = PointIndex::new(&facilities.iter().map(Facility::location).collect::<Vec<_>>());

        let population_outside_radius = points.iter()
            .filter(|p| !facility_index.any_within(p.location(), radius))
            .map(PopulationPoint::weight)
            .sum::<f64>();

        let cells = bbox.cell_centers(step)
            .map(|center| self.evaluate(center, points, &point_index, &facility_index))
            .filter(|cell| self.include(cell, &point_index))
            .collect::<Vec<_>>();

        info!(rows, cols, kept = cells.len(), aggressive = self.options.aggressive_filtering, "heatmap generated");

        Ok(Heatmap {
            service_radius_km: radius,
            total_population: total_population(points),
            population_outside_radius,
            cells,
        })
    }

    fn evaluate(&self, center: Point<f64>, points: &[PopulationPoint], point_index: &PointIndex, facility_index: &PointIndex) -> HeatmapCell {
        let search = self.options.search_radius_km();
        let weighted = point_index.within(center, search).into_iter()
            .map(|idx| {
                let d = haversine_km(center, point_index.point(idx));
                points[idx].weight() * (1.0 - d / search)
            })
            .sum::<f64>();
        let density = finite_or(weighted / self.options.cell_area_km2(), 0.0).max(0.0);

        let (access, distance) = match facility_index.nearest(center) {
            Some((_, d)) => (access_score(d, self.options.service_radius_km), finite_or(d, NO_FACILITY_DISTANCE_KM)),
            None => (0.0, NO_FACILITY_DISTANCE_KM),
        };

        HeatmapCell {
            latitude: center.y(),
            longitude: center.x(),
            population_density: density,
            access_score: access,
            distance_to_facility_km: distance,
        }
    }

    fn include(&self, cell: &HeatmapCell, point_index: &PointIndex) -> bool {
        if cell.is_populated() {
            return true;
        }
        if !self.options.aggressive_filtering {
            return !cell.is_fully_served();
        }
        cell.access_score < UNDERSERVED_ACCESS
            || (!cell.is_fully_served()
                && point_index.any_within(Point::new(cell.longitude, cell.latitude), NEARBY_POPULATION_KM))
    }
}

/// Generate a heatmap with the default grid size.
pub fn generate_heatmap(
    points: &[PopulationPoint],
    facilities: &[Facility],
    bounding_box: Option<BoundingBox>,
    service_radius_km: f64,
    aggressive_filtering: bool,
) -> Result<Heatmap> {
    HeatmapGridGenerator::new(HeatmapOptions::new(service_radius_km, aggressive_filtering))?
        .generate(points, facilities, bounding_box)
}
