use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, require_positive};
use crate::geom::PointIndex;
use crate::priority::normalize::min_max;
use crate::priority::weights::PriorityWeights;
use crate::types::{Facility, PopulationPoint, SubArea};

/// Normalized priority factors and rank of one sub-area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAreaScore {
    pub sub_area_id: String,
    pub sub_area_name: String,
    pub gap_factor: f64,
    pub efficiency_factor: f64,
    pub vulnerability_factor: f64,
    pub composite_score: f64,
    pub rank: usize,
}

/// Un-normalized factor values of one sub-area.
///
/// Both population-based factors use the record `population_count` when present,
/// otherwise the sum of the sub-area's population points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawFactors {
    /// Share of the population outside the service radius, capped at 1.
    pub gap: f64,
    /// Population per square kilometre.
    pub efficiency: f64,
    /// Vulnerability indicator taken from the sub-area record.
    pub vulnerability: f64,
}

#[inline]
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Ranks sub-areas of one regency by a weighted Gap/Efficiency/Vulnerability score.
#[derive(Debug, Clone)]
pub struct PriorityScorer {
    service_radius_km: f64,
    weights: PriorityWeights,
}

impl PriorityScorer {
    /// Build a scorer; fails if the radius is not positive or the weights are invalid.
    pub fn new(service_radius_km: f64, weights: PriorityWeights) -> Result<Self> {
        require_positive("service_radius_km", service_radius_km)?;
        weights.validate()?;
        Ok(Self { service_radius_km, weights })
    }

    #[inline] pub fn weights(&self) -> &PriorityWeights { &self.weights }

    #[inline] pub fn service_radius_km(&self) -> f64 { self.service_radius_km }

    /// Raw factors for each sub-area, in input order.
    pub fn raw_factors(&self, sub_areas: &[SubArea], points: &[PopulationPoint], facilities: &[Facility]) -> Vec<RawFactors> {
        let index = PointIndex::new(&facilities.iter().map(Facility::location).collect::<Vec<_>>());

        // sub_area_id -> (population, population outside the service radius)
        let mut tally: AHashMap<&str, (f64, f64)> = AHashMap::new();
        for point in points {
            let entry = tally.entry(point.sub_area_id.as_str()).or_default();
            entry.0 += point.weight();
            if !index.any_within(point.location(), self.service_radius_km) {
                entry.1 += point.weight();
            }
        }

        sub_areas.iter()
            .map(|sub_area| {
                let (point_population, outside) = tally.get(sub_area.id.as_str()).copied().unwrap_or_default();

                let population = sub_area.population_count
                    .filter(|p| p.is_finite() && *p >= 0.0)
                    .unwrap_or(point_population);

                let gap = if population > 0.0 { (outside / population).min(1.0) } else { 0.0 };
                let efficiency = if sub_area.area_km2 > 0.0 { population / sub_area.area_km2 } else { 0.0 };

                RawFactors {
                    gap: finite_or_zero(gap),
                    efficiency: finite_or_zero(efficiency),
                    vulnerability: finite_or_zero(sub_area.poverty_level.unwrap_or(0.0)),
                }
            })
            .collect()
    }

    /// Score and rank `sub_areas`, highest composite first; ties keep input order.
    pub fn score(&self, sub_areas: &[SubArea], points: &[PopulationPoint], facilities: &[Facility]) -> Vec<SubAreaScore> {
        let raw = self.raw_factors(sub_areas, points, facilities);

        let gap = min_max(&raw.iter().map(|r| r.gap).collect::<Vec<_>>());
        let efficiency = min_max(&raw.iter().map(|r| r.efficiency).collect::<Vec<_>>());
        let vulnerability = min_max(&raw.iter().map(|r| r.vulnerability).collect::<Vec<_>>());

        let mut scores = sub_areas.iter().enumerate()
            .map(|(i, sub_area)| SubAreaScore {
                sub_area_id: sub_area.id.clone(),
                sub_area_name: sub_area.name.clone(),
                gap_factor: gap[i],
                efficiency_factor: efficiency[i],
                vulnerability_factor: vulnerability[i],
                composite_score: self.weights.combine(gap[i], efficiency[i], vulnerability[i]),
                rank: 0,
            })
            .collect::<Vec<_>>();

        // `sort_by` is stable, so equal composites keep input order.
        scores.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
        for (i, score) in scores.iter_mut().enumerate() {
            score.rank = i + 1;
        }

        debug!(sub_areas = scores.len(), "priority scores computed");
        scores
    }
}

/// Validate `weights`, then score and rank `sub_areas`.
pub fn compute_priority_scores(
    sub_areas: &[SubArea],
    points: &[PopulationPoint],
    facilities: &[Facility],
    service_radius_km: f64,
    weights: PriorityWeights,
) -> Result<Vec<SubAreaScore>> {
    Ok(PriorityScorer::new(service_radius_km, weights)?.score(sub_areas, points, facilities))
}
