use super::common::*;
use crate::scoring::{format_points, ScoringEngine};

#[test]
fn total_matches_sum_of_components_for_every_profile() {
    let engine = engine();
    for input in [best_inputs(), middling_inputs(), worst_inputs()] {
        for profile in all_profiles() {
            let breakdown = engine.score(profile, &input).expect("scores");
            let summed: f64 = breakdown
                .components
                .iter()
                .map(|component| component.points)
                .sum();
            assert_eq!(summed, breakdown.total, "{profile} total drifted");
        }
    }
}

#[test]
fn best_inputs_reach_one_hundred_for_every_profile() {
    let engine = engine();
    for profile in all_profiles() {
        let breakdown = engine.score(profile, &best_inputs()).expect("scores");
        assert_eq!(breakdown.total, 100.0, "{profile} does not reach 100");
        assert_eq!(ScoringEngine::max_total(profile), 100.0);
    }
}

#[test]
fn worst_inputs_score_zero_for_every_profile() {
    let engine = engine();
    for profile in all_profiles() {
        let breakdown = engine.score(profile, &worst_inputs()).expect("scores");
        assert_eq!(breakdown.total, 0.0, "{profile} awarded points for misses");
    }
}

#[test]
fn breakdown_follows_rule_table_order() {
    let engine = engine();
    for profile in all_profiles() {
        let breakdown = engine.score(profile, &middling_inputs()).expect("scores");
        let criteria: Vec<_> = breakdown
            .components
            .iter()
            .map(|component| component.criterion)
            .collect();
        assert_eq!(criteria, ScoringEngine::criteria(profile));
    }
}

#[test]
fn every_profile_requires_its_criteria_inputs() {
    for profile in all_profiles() {
        let required = ScoringEngine::required_metrics(profile);
        assert!(!required.is_empty());
        for criterion in ScoringEngine::criteria(profile) {
            assert!(criterion
                .metrics()
                .iter()
                .all(|metric| required.contains(metric)));
        }
    }
}

#[test]
fn points_format_drops_trailing_zero_only_for_whole_numbers() {
    assert_eq!(format_points(25.0), "25");
    assert_eq!(format_points(7.5), "7.5");
    assert_eq!(format_points(0.0), "0");
}
