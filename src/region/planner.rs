use ahash::AHashMap;
use anyhow::Result;
use tracing::info;

use crate::allocate::{AllocationResult, GreedyAllocator};
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::geom::BoundingBox;
use crate::heatmap::{Heatmap, HeatmapGridGenerator};
use crate::priority::{PriorityScorer, PriorityWeights, SubAreaScore};
use crate::region::repository::RegionRepository;
use crate::region::scope::Scope;
use crate::types::{Facility, PopulationPoint, Regency, SubArea};

/// Runs planning requests against a region repository.
#[derive(Debug, Clone)]
pub struct Planner<R: RegionRepository> {
    repository: R,
    config: PlannerConfig,
}

impl<R: RegionRepository> Planner<R> {
    pub fn new(repository: R, config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { repository, config })
    }

    #[inline] pub fn config(&self) -> &PlannerConfig { &self.config }

    #[inline] pub fn repository(&self) -> &R { &self.repository }

    fn regency(&self, regency_id: &str) -> Result<Regency> {
        Ok(self.repository.regency(regency_id)?
            .ok_or_else(|| PlanError::UnknownRegion(regency_id.to_string()))?)
    }

    fn scoped_sub_areas(&self, scope: &Scope) -> Result<Vec<SubArea>> {
        let sub_areas = self.repository.sub_areas(scope)?;
        if sub_areas.is_empty() {
            return Err(PlanError::UnknownRegion(scope.to_string()).into());
        }
        Ok(sub_areas)
    }

    /// Facilities of `sub_area_ids` plus any facility within `margin_km` of the points' bounding box.
    fn facilities_near(&self, sub_area_ids: &[String], points: &[PopulationPoint], margin_km: f64) -> Result<Vec<Facility>> {
        let bbox = BoundingBox::from_points(points.iter()
            .filter(|p| p.latitude.is_finite() && p.longitude.is_finite())
            .map(PopulationPoint::location));
        match bbox {
            Some(bbox) => self.repository.facilities_around(sub_area_ids, &bbox.expand_km(margin_km)),
            None => self.repository.facilities(sub_area_ids),
        }
    }

    /// Recommend new facilities for every sub-area in `scope` within `budget`.
    pub fn simulate(&self, scope: &Scope, budget: f64) -> Result<AllocationResult> {
        let sub_areas = self.scoped_sub_areas(scope)?;
        let ids = sub_areas.iter().map(|s| s.id.clone()).collect::<Vec<_>>();
        let points = self.repository.population_points(&ids)?;
        let existing = self.facilities_near(&ids, &points, self.config.facility_types.max_radius_km())?;
        info!(%scope, sub_areas = ids.len(), points = points.len(), existing = existing.len(), budget, "running simulation");

        let allocator = GreedyAllocator::new(self.config.facility_types.clone())?
            .with_generator(self.config.generator());
        let mut result = allocator.allocate(&points, &existing, budget)?;

        let names: AHashMap<&str, &str> = sub_areas.iter().map(|s| (s.id.as_str(), s.name.as_str())).collect();
        for rec in &mut result.recommendations {
            rec.sub_area_name = rec.sub_area_id.as_deref()
                .and_then(|id| names.get(id))
                .map(|name| name.to_string());
        }
        Ok(result)
    }

    /// Rank the sub-areas of one regency; `weights` default to the configured ones.
    pub fn priority_scores(&self, regency_id: &str, weights: Option<PriorityWeights>) -> Result<Vec<SubAreaScore>> {
        let regency = self.regency(regency_id)?;
        let scorer = PriorityScorer::new(self.config.service_radius_km, weights.unwrap_or(self.config.weights))?;

        let sub_areas = self.repository.sub_areas(&Scope::regency(&regency.id))?;
        let ids = sub_areas.iter().map(|s| s.id.clone()).collect::<Vec<_>>();
        let points = self.repository.population_points(&ids)?;
        let facilities = self.facilities_near(&ids, &points, self.config.service_radius_km)?;
        info!(regency = %regency.name, sub_areas = ids.len(), "computing priority scores");

        Ok(scorer.score(&sub_areas, &points, &facilities))
    }

    /// Access heatmap over the population of one regency.
    pub fn heatmap(&self, regency_id: &str, aggressive_filtering: bool) -> Result<Heatmap> {
        let regency = self.regency(regency_id)?;
        let generator = HeatmapGridGenerator::new(self.config.heatmap_options(aggressive_filtering))?;

        let sub_areas = self.repository.sub_areas(&Scope::regency(&regency.id))?;
        let ids = sub_areas.iter().map(|s| s.id.clone()).collect::<Vec<_>>();
        let points = self.repository.population_points(&ids)?;
        // Access decays to zero at twice the service radius.
        let facilities = self.facilities_near(&ids, &points, 2.0 * self.config.service_radius_km)?;
        info!(regency = %regency.name, points = points.len(), facilities = facilities.len(), "generating heatmap");

        Ok(generator.generate(&points, &facilities, None)?)
    }
}
