use serde::{Deserialize, Serialize};

/// Distance reported for a cell when no facility exists at all, in km.
pub const NO_FACILITY_DISTANCE_KM: f64 = 999_999.0;

/// One grid cell of the access heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub latitude: f64,
    pub longitude: f64,
    /// Inverse-distance weighted population per square kilometre.
    pub population_density: f64,
    /// 1.0 inside the service radius, decaying linearly to 0.0 at twice the radius.
    pub access_score: f64,
    pub distance_to_facility_km: f64,
}

impl HeatmapCell {
    #[inline] pub fn is_populated(&self) -> bool { self.population_density > 0.0 }

    #[inline] pub fn is_fully_served(&self) -> bool { self.access_score >= 1.0 }
}

/// Heatmap cells plus the population summary of the same request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub service_radius_km: f64,
    pub total_population: f64,
    /// Population of points farther than the service radius from every facility.
    pub population_outside_radius: f64,
    pub cells: Vec<HeatmapCell>,
}

impl Heatmap {
    /// A heatmap with no cells and no population.
    pub(crate) fn empty(service_radius_km: f64) -> Self {
        Self { service_radius_km, total_population: 0.0, population_outside_radius: 0.0, cells: Vec::new() }
    }

    #[inline] pub fn len(&self) -> usize { self.cells.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    /// Share of the population outside the service radius, in [0, 1].
    pub fn gap_ratio(&self) -> f64 {
        if self.total_population > 0.0 {
            (self.population_outside_radius / self.total_population).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
