//! Randomized invariants of the allocator, scorer and heatmap.

use proptest::prelude::*;

use siteplan::{
    Facility, FacilityTypeSpec, FacilityTypes, PopulationPoint, PriorityWeights, SubArea, allocate_facilities,
    compute_priority_scores, generate_heatmap,
};

/// Up to 30 points scattered over roughly 40 x 40 km, in five sub-areas.
fn points_strategy() -> impl Strategy<Value = Vec<PopulationPoint>> {
    prop::collection::vec((0.0..5_000.0f64, -0.2..0.2f64, -0.2..0.2f64, 0..5usize), 0..30).prop_map(|rows| {
        rows.into_iter().enumerate()
            .map(|(i, (count, dlat, dlon, sub_area))| {
                PopulationPoint::new(format!("p{i}"), count, -6.5 + dlat, 106.8 + dlon, format!("s{sub_area}"))
            })
            .collect()
    })
}

fn facilities_strategy() -> impl Strategy<Value = Vec<Facility>> {
    prop::collection::vec((-0.2..0.2f64, -0.2..0.2f64, any::<bool>()), 0..4).prop_map(|rows| {
        rows.into_iter()
            .map(|(dlat, dlon, big)| Facility::new(if big { "Puskesmas" } else { "Pustu" }, -6.5 + dlat, 106.8 + dlon))
            .collect()
    })
}

fn single_tier() -> FacilityTypes {
    FacilityTypes::new(vec![FacilityTypeSpec::new("Pustu", 500_000_000.0, 3.0)]).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn never_overspends(points in points_strategy(), existing in facilities_strategy(), budget in 0.0..10_000_000_000.0f64) {
        let result = allocate_facilities(&points, &existing, &FacilityTypes::default(), budget).unwrap();
        prop_assert!(result.budget_used >= 0.0);
        prop_assert!(result.budget_used <= budget);
        prop_assert!((0.0..=100.0).contains(&result.coverage_percentage));
        prop_assert!(result.coverage_percentage >= result.coverage_before_percentage);
    }

    #[test]
    fn identical_inputs_give_identical_results(points in points_strategy(), budget in 0.0..5_000_000_000.0f64) {
        let first = allocate_facilities(&points, &[], &FacilityTypes::default(), budget).unwrap();
        let second = allocate_facilities(&points, &[], &FacilityTypes::default(), budget).unwrap();
        prop_assert_eq!(first.recommendations, second.recommendations);
    }

    #[test]
    fn single_tier_coverage_is_monotone_in_budget(
        points in points_strategy(),
        existing in facilities_strategy(),
        low in 0.0..5_000_000_000.0f64,
        extra in 0.0..5_000_000_000.0f64,
    ) {
        let types = single_tier();
        let existing = existing.into_iter().map(|f| Facility { facility_type: "Pustu".into(), ..f }).collect::<Vec<_>>();
        let smaller = allocate_facilities(&points, &existing, &types, low).unwrap();
        let larger = allocate_facilities(&points, &existing, &types, low + extra).unwrap();
        prop_assert!(larger.coverage_percentage >= smaller.coverage_percentage);
        prop_assert!(larger.total_population_covered >= smaller.total_population_covered);
    }

    #[test]
    fn priority_factors_are_normalized(points in points_strategy(), facilities in facilities_strategy(), areas in prop::collection::vec((0.0..200.0f64, 0.0..30.0f64), 5)) {
        let sub_areas = areas.iter().enumerate()
            .map(|(i, &(area, poverty))| SubArea::new(format!("s{i}"), format!("Sub-area {i}"), "r1").with_area(area).with_poverty_level(poverty))
            .collect::<Vec<_>>();
        let scores = compute_priority_scores(&sub_areas, &points, &facilities, 5.0, PriorityWeights::default()).unwrap();

        prop_assert_eq!(scores.len(), 5);
        for (i, score) in scores.iter().enumerate() {
            prop_assert_eq!(score.rank, i + 1);
            for factor in [score.gap_factor, score.efficiency_factor, score.vulnerability_factor] {
                prop_assert!((0.0..=1.0).contains(&factor));
            }
            prop_assert!(score.composite_score.is_finite());
        }
    }

    #[test]
    fn heatmap_without_facilities_has_no_access(points in points_strategy()) {
        let heatmap = generate_heatmap(&points, &[], None, 5.0, true).unwrap();
        for cell in &heatmap.cells {
            prop_assert_eq!(cell.access_score, 0.0);
            prop_assert!(cell.population_density.is_finite() && cell.population_density >= 0.0);
        }
    }
}
