use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::candidate::{CandidateGenerator, ClusterCount};
use crate::heatmap::HeatmapOptions;
use crate::priority::PriorityWeights;
use crate::types::FacilityTypes;

/// Tunable parameters shared by every planning request.
///
/// Missing fields fall back to their defaults, so a config file only needs the
/// values it changes:
///
/// ```json
/// { "service_radius_km": 3.0, "weights": { "gap": 0.5, "efficiency": 0.25, "vulnerability": 0.25 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub facility_types: FacilityTypes,
    pub weights: PriorityWeights,
    /// Radius used by priority scoring and the heatmap, in km.
    pub service_radius_km: f64,
    pub grid_size_deg: f64,
    pub max_heatmap_cells: usize,
    pub cluster_count: ClusterCount,
    pub seed: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let heatmap = HeatmapOptions::default();
        Self {
            facility_types: FacilityTypes::default(),
            weights: PriorityWeights::default(),
            service_radius_km: heatmap.service_radius_km,
            grid_size_deg: heatmap.grid_size_deg,
            max_heatmap_cells: heatmap.max_cells,
            cluster_count: ClusterCount::default(),
            seed: CandidateGenerator::default().seed(),
        }
    }
}

impl PlannerConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        self.facility_types.validate()?;
        self.weights.validate()?;
        self.heatmap_options(true).validate()?;
        Ok(())
    }

    /// Candidate generator for this config's cluster count and seed.
    #[inline]
    pub fn generator(&self) -> CandidateGenerator {
        CandidateGenerator::new(self.cluster_count, self.seed)
    }

    pub fn heatmap_options(&self, aggressive_filtering: bool) -> HeatmapOptions {
        HeatmapOptions::new(self.service_radius_km, aggressive_filtering)
            .with_grid_size(self.grid_size_deg)
            .with_max_cells(self.max_heatmap_cells)
    }
}
