use std::fmt;

use serde::{Deserialize, Serialize};

/// A new facility the allocator recommends building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub facility_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub sub_area_id: Option<String>,
    #[serde(default)]
    pub sub_area_name: Option<String>,
    pub estimated_cost: f64,
    pub population_covered: f64,
    pub coverage_radius_km: f64,
}

/// One iteration of the greedy loop, kept for auditing the selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationStep {
    pub iteration: usize,
    pub site: usize,
    pub facility_type: String,
    pub coverage_increase: f64,
    pub cost: f64,
    /// Population newly covered per unit of currency.
    pub efficiency: f64,
    pub remaining_budget: f64,
    pub covered_point_ids: Vec<String>,
}

/// Outcome of a budget-constrained allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub recommendations: Vec<Recommendation>,
    pub steps: Vec<AllocationStep>,
    pub total_budget: f64,
    pub budget_used: f64,
    pub total_population: f64,
    /// Population already served by existing facilities.
    pub baseline_covered: f64,
    /// Population newly covered by the recommendations (baseline excluded).
    pub total_population_covered: f64,
    pub coverage_before_percentage: f64,
    pub coverage_percentage: f64,
}

/// Covered share of `total` in percent; an empty population counts as fully covered.
pub(crate) fn coverage_percent(covered: f64, total: f64) -> f64 {
    if total > 0.0 {
        let pct = covered / total * 100.0;
        if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 }
    } else {
        100.0
    }
}

impl AllocationResult {
    /// A run that recommends nothing.
    pub(crate) fn unchanged(total_budget: f64, total_population: f64, baseline_covered: f64) -> Self {
        let coverage = coverage_percent(baseline_covered, total_population);
        Self {
            recommendations: Vec::new(),
            steps: Vec::new(),
            total_budget,
            budget_used: 0.0,
            total_population,
            baseline_covered,
            total_population_covered: 0.0,
            coverage_before_percentage: coverage,
            coverage_percentage: coverage,
        }
    }

    /// Number of recommended facilities.
    #[inline] pub fn facilities_recommended(&self) -> usize { self.recommendations.len() }

    /// Budget left after the recommendations.
    #[inline] pub fn remaining_budget(&self) -> f64 { self.total_budget - self.budget_used }
}

impl fmt::Display for AllocationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Allocation {{")?;
        writeln!(f, "  budget: {:.0} used of {:.0}", self.budget_used, self.total_budget)?;
        writeln!(f, "  coverage: {:.2}% -> {:.2}% ({:.0} newly covered of {:.0})",
            self.coverage_before_percentage, self.coverage_percentage,
            self.total_population_covered, self.total_population)?;
        for (step, rec) in self.steps.iter().zip(&self.recommendations) {
            writeln!(f, "  {:2}: {} at ({:.5}, {:.5}) covers {:.0} for {:.0} (eff {:.3e})",
                step.iteration, rec.facility_type, rec.latitude, rec.longitude,
                rec.population_covered, rec.estimated_cost, step.efficiency)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_percent_guards_empty_population() {
        assert_eq!(coverage_percent(0.0, 0.0), 100.0);
        assert_eq!(coverage_percent(25.0, 100.0), 25.0);
        assert_eq!(coverage_percent(f64::NAN, 100.0), 0.0);
    }

    #[test]
    fn unchanged_run_reports_baseline() {
        let result = AllocationResult::unchanged(1_000.0, 400.0, 100.0);
        assert_eq!(result.facilities_recommended(), 0);
        assert_eq!(result.budget_used, 0.0);
        assert_eq!(result.remaining_budget(), 1_000.0);
        assert_eq!(result.coverage_percentage, 25.0);
        assert_eq!(result.coverage_before_percentage, 25.0);
    }

    #[test]
    fn display_lists_budget_and_coverage() {
        let text = AllocationResult::unchanged(500.0, 0.0, 0.0).to_string();
        assert!(text.contains("budget: 0 used of 500"));
        assert!(text.contains("100.00%"));
    }
}
