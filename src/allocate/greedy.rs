use tracing::{debug, info};

use crate::allocate::result::{AllocationResult, AllocationStep, Recommendation, coverage_percent};
use crate::candidate::{CandidateGenerator, CandidateSite};
use crate::coverage::{CoverageTracker, underserved};
use crate::error::{PlanError, Result};
use crate::types::{Facility, FacilityTypeSpec, FacilityTypes, PopulationPoint, total_population};

/// Best (candidate, type) pair found in one pass over the candidates.
struct Choice<'a> {
    site: usize,
    spec: &'a FacilityTypeSpec,
    gain: f64,
    efficiency: f64,
}

/// Budget-constrained greedy facility placement.
///
/// Each iteration takes the affordable (site, type) pair with the highest newly covered
/// population per unit cost, then retires that site. The loop ends when the budget drops
/// below the cheapest type, no site is left, or no pair covers anyone new.
#[derive(Debug, Clone)]
pub struct GreedyAllocator {
    types: FacilityTypes,
    generator: CandidateGenerator,
}

impl GreedyAllocator {
    /// Build an allocator over a validated facility catalog.
    pub fn new(types: FacilityTypes) -> Result<Self> {
        types.validate()?;
        Ok(Self { types, generator: CandidateGenerator::default() })
    }

    /// Replace the candidate generator (cluster count, seed).
    pub fn with_generator(mut self, generator: CandidateGenerator) -> Self {
        self.generator = generator;
        self
    }

    #[inline] pub fn types(&self) -> &FacilityTypes { &self.types }

    /// Recommend new facilities for `points` given `existing` ones and a `budget`.
    pub fn allocate(&self, points: &[PopulationPoint], existing: &[Facility], budget: f64) -> Result<AllocationResult> {
        if !(budget.is_finite() && budget >= 0.0) {
            return Err(PlanError::InvalidBudget(budget));
        }

        let total = total_population(points);
        let split = underserved(points, existing, &self.types);
        let mut result = AllocationResult::unchanged(budget, total, split.baseline_covered);

        if split.underserved.is_empty() {
            info!(points = points.len(), "every population point is already served");
            return Ok(result);
        }

        let min_cost = self.types.min_cost().unwrap_or(f64::INFINITY);
        if budget < min_cost {
            info!(budget, min_cost, "budget below the cheapest facility type");
            return Ok(result);
        }

        let sites = self.generator.sites(&split.underserved, self.types.len());
        let candidates = CandidateGenerator::candidates(&sites, &self.types);
        debug!(underserved = split.underserved.len(), sites = sites.len(), candidates = candidates.len(), "candidates generated");

        let mut tracker = CoverageTracker::new(&split.underserved);
        let mut active = vec![true; sites.len()];
        let mut remaining = budget;

        while remaining >= min_cost && active.iter().any(|&a| a) {
            let mut best: Option<Choice> = None;

            for candidate in candidates.iter().filter(|c| active[c.site]) {
                let spec = self.types.get(&candidate.facility_type)?;
                if spec.construction_cost > remaining { continue }

                let gain = tracker.marginal_gain(sites[candidate.site].location(), spec.coverage_radius_km);
                if !(gain > 0.0) { continue }

                // Strict comparison: the first pair in enumeration order wins ties.
                let efficiency = gain / spec.construction_cost;
                if best.as_ref().is_none_or(|b| efficiency > b.efficiency) {
                    best = Some(Choice { site: candidate.site, spec, gain, efficiency });
                }
            }

            let Some(choice) = best else {
                debug!(remaining, "no candidate covers additional population");
                break;
            };

            let site: &CandidateSite = &sites[choice.site];
            let newly = tracker.cover(site.location(), choice.spec.coverage_radius_km);
            remaining -= choice.spec.construction_cost;
            active[choice.site] = false;

            debug!(
                iteration = result.steps.len() + 1,
                site = choice.site,
                facility_type = %choice.spec.name,
                gain = choice.gain,
                efficiency = choice.efficiency,
                remaining,
                "selected candidate"
            );

            result.recommendations.push(Recommendation {
                facility_type: choice.spec.name.clone(),
                latitude: site.latitude,
                longitude: site.longitude,
                sub_area_id: site.sub_area_id.clone(),
                sub_area_name: None,
                estimated_cost: choice.spec.construction_cost,
                population_covered: choice.gain,
                coverage_radius_km: choice.spec.coverage_radius_km,
            });
            result.steps.push(AllocationStep {
                iteration: result.steps.len() + 1,
                site: choice.site,
                facility_type: choice.spec.name.clone(),
                coverage_increase: choice.gain,
                cost: choice.spec.construction_cost,
                efficiency: choice.efficiency,
                remaining_budget: remaining,
                covered_point_ids: newly.iter().map(|&idx| split.underserved[idx].id.clone()).collect(),
            });
        }

        result.budget_used = budget - remaining;
        result.total_population_covered = tracker.covered_population();
        result.coverage_percentage = coverage_percent(split.baseline_covered + result.total_population_covered, total);

        info!(
            facilities = result.recommendations.len(),
            budget_used = result.budget_used,
            coverage_before = result.coverage_before_percentage,
            coverage_after = result.coverage_percentage,
            "allocation finished"
        );
        Ok(result)
    }
}

/// Run the greedy allocator with default candidate generation.
pub fn allocate_facilities(
    points: &[PopulationPoint],
    existing: &[Facility],
    types: &FacilityTypes,
    budget: f64,
) -> Result<AllocationResult> {
    GreedyAllocator::new(types.clone())?.allocate(points, existing, budget)
}
