use crate::scoring::{Metric, MetricInput, Profile, ScoringConfig, ScoringEngine};

use super::domain::EvaluationSubmission;

pub const MIN_YEAR: i32 = 2024;
pub const MAX_YEAR: i32 = 2030;

/// Form-boundary rejection raised before the scoring engine runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("employee name is required")]
    MissingEmployeeName,
    #[error("year {year} is outside {}-{}", MIN_YEAR, MAX_YEAR)]
    YearOutOfRange { year: i32 },
    #[error("{profile} evaluation is missing the {metric}")]
    MissingMetric { profile: Profile, metric: Metric },
    #[error("{metric} must be between {min} and {max}, got {value}")]
    OutOfRange {
        metric: Metric,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Checks that the submission carries every input its profile scores, each
/// within its declared range. Inputs the profile does not read are ignored.
pub fn validate_submission(
    submission: &EvaluationSubmission,
    config: &ScoringConfig,
) -> Result<(), ValidationError> {
    if submission.employee_name.trim().is_empty() {
        return Err(ValidationError::MissingEmployeeName);
    }

    if !(MIN_YEAR..=MAX_YEAR).contains(&submission.year) {
        return Err(ValidationError::YearOutOfRange {
            year: submission.year,
        });
    }

    let profile = submission.profile;
    let metrics = &submission.metrics;
    for metric in ScoringEngine::required_metrics(profile) {
        if !metrics.has(metric) {
            return Err(ValidationError::MissingMetric { profile, metric });
        }
        if let Some((value, min, max)) = bounded_value(metrics, metric, profile, config) {
            if !value.is_finite() || value < min || value > max {
                return Err(ValidationError::OutOfRange {
                    metric,
                    value,
                    min,
                    max,
                });
            }
        }
    }

    Ok(())
}

fn bounded_value(
    metrics: &MetricInput,
    metric: Metric,
    profile: Profile,
    config: &ScoringConfig,
) -> Option<(f64, f64, f64)> {
    match metric {
        Metric::FillRate => metrics.fill_rate.map(|value| (value, 0.0, 100.0)),
        Metric::Proximity => metrics.proximity.map(|value| (value, 0.0, 100.0)),
        Metric::PerfectDelivery => metrics.perfect_delivery.map(|value| (value, 0.0, 100.0)),
        Metric::OutOfStock => {
            let max = config.oos_scale(profile).upper_bound();
            metrics.out_of_stock.map(|value| (value, 0.0, max))
        }
        Metric::InventoryVariance => metrics
            .inventory_variance
            .map(|value| (value, 0.0, f64::MAX)),
        Metric::ShrinkRate => metrics.shrink_rate.map(|value| (value, 0.0, 1.0)),
        Metric::DepartureTime
        | Metric::FirstVisitTime
        | Metric::Archetype
        | Metric::Breakage
        | Metric::FalseoCount => None,
    }
}
