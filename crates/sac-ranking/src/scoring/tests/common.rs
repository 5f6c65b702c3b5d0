use chrono::NaiveTime;

use crate::scoring::{BreakageStatus, MetricInput, Profile, ScoringConfig, ScoringEngine};

pub(super) fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default())
}

/// Inputs that reach the top band of every criterion any profile reads.
pub(super) fn best_inputs() -> MetricInput {
    MetricInput {
        departure_time: Some(at(7, 30)),
        first_visit_time: Some(at(8, 30)),
        fill_rate: Some(99.0),
        proximity: Some(99.0),
        perfect_delivery: Some(99.0),
        out_of_stock: Some(0.04),
        inventory_variance: Some(400.0),
        archetype: Some("E".to_string()),
        shrink_rate: Some(0.04),
        breakage: Some(BreakageStatus::OnTarget),
        falseo_count: Some(0),
    }
}

/// Inputs that miss every band.
pub(super) fn worst_inputs() -> MetricInput {
    MetricInput {
        departure_time: Some(at(9, 30)),
        first_visit_time: Some(at(10, 30)),
        fill_rate: Some(90.0),
        proximity: Some(90.0),
        perfect_delivery: Some(90.0),
        out_of_stock: Some(5.0),
        inventory_variance: Some(20_000.0),
        archetype: Some("A".to_string()),
        shrink_rate: Some(0.5),
        breakage: Some(BreakageStatus::OffTarget),
        falseo_count: Some(12),
    }
}

/// Inputs sitting in the middle band of every criterion.
pub(super) fn middling_inputs() -> MetricInput {
    MetricInput {
        departure_time: Some(at(7, 45)),
        first_visit_time: Some(at(9, 30)),
        fill_rate: Some(97.5),
        proximity: Some(96.2),
        perfect_delivery: Some(95.5),
        out_of_stock: Some(0.8),
        inventory_variance: Some(1_500.0),
        archetype: Some("C".to_string()),
        shrink_rate: Some(0.07),
        breakage: Some(BreakageStatus::OnTarget),
        falseo_count: Some(5),
    }
}

pub(super) fn all_profiles() -> [Profile; 7] {
    Profile::ordered()
}
