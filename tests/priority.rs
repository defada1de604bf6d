//! Priority scoring through the public entry point.

use siteplan::{Facility, PlanError, PopulationPoint, PriorityWeights, SubArea, compute_priority_scores};

fn make_test_region() -> (Vec<SubArea>, Vec<PopulationPoint>, Vec<Facility>) {
    let sub_areas = vec![
        SubArea::new("320101", "Cibinong", "3201").with_area(43.4).with_poverty_level(6.2),
        SubArea::new("320102", "Gunung Putri", "3201").with_area(56.5).with_poverty_level(8.9),
        SubArea::new("320103", "Citeureup", "3201").with_area(65.6).with_poverty_level(7.1),
        SubArea::new("320104", "Sukaraja", "3201").with_area(42.0).with_poverty_level(11.3),
    ];
    let points = vec![
        PopulationPoint::new("p1", 12_000.0, -6.48, 106.85, "320101"),
        PopulationPoint::new("p2", 9_000.0, -6.45, 106.92, "320102"),
        PopulationPoint::new("p3", 4_000.0, -6.52, 106.95, "320103"),
        PopulationPoint::new("p4", 3_000.0, -6.56, 106.84, "320104"),
        PopulationPoint::new("p5", 2_500.0, -6.60, 106.80, "320104"),
    ];
    let facilities = vec![Facility::new("Puskesmas", -6.48, 106.85).in_sub_area("320101")];
    (sub_areas, points, facilities)
}

#[test]
fn weights_summing_to_point_nine_are_rejected() {
    let (sub_areas, points, facilities) = make_test_region();
    let weights = PriorityWeights { gap: 0.4, efficiency: 0.3, vulnerability: 0.2 };
    let err = compute_priority_scores(&sub_areas, &points, &facilities, 5.0, weights).unwrap_err();
    assert!(matches!(err, PlanError::InvalidWeights { .. }));
}

#[test]
fn weights_within_tolerance_are_accepted() {
    let (sub_areas, points, facilities) = make_test_region();
    for vulnerability in [0.2995, 0.3, 0.3005] {
        let weights = PriorityWeights { gap: 0.4, efficiency: 0.3, vulnerability };
        assert!(compute_priority_scores(&sub_areas, &points, &facilities, 5.0, weights).is_ok());
    }
}

#[test]
fn ranks_form_a_total_order() {
    let (sub_areas, points, facilities) = make_test_region();
    let scores = compute_priority_scores(&sub_areas, &points, &facilities, 5.0, PriorityWeights::default()).unwrap();

    assert_eq!(scores.len(), sub_areas.len());
    for (i, score) in scores.iter().enumerate() {
        assert_eq!(score.rank, i + 1);
        for factor in [score.gap_factor, score.efficiency_factor, score.vulnerability_factor] {
            assert!((0.0..=1.0).contains(&factor));
        }
    }
    assert!(scores.windows(2).all(|w| w[0].composite_score >= w[1].composite_score));
}

#[test]
fn served_sub_area_has_lowest_gap() {
    let (sub_areas, points, facilities) = make_test_region();
    let scores = compute_priority_scores(&sub_areas, &points, &facilities, 5.0, PriorityWeights::default()).unwrap();
    let cibinong = scores.iter().find(|s| s.sub_area_id == "320101").unwrap();
    assert_eq!(cibinong.gap_factor, 0.0);
    assert_eq!(cibinong.sub_area_name, "Cibinong");
    // Sukaraja is entirely outside the radius and the poorest.
    assert_eq!(scores.iter().find(|s| s.sub_area_id == "320104").unwrap().vulnerability_factor, 1.0);
}

#[test]
fn empty_input_gives_empty_ranking() {
    let scores = compute_priority_scores(&[], &[], &[], 5.0, PriorityWeights::default()).unwrap();
    assert!(scores.is_empty());
}
