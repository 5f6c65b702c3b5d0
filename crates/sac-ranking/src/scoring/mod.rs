//! Scoring rules engine.
//!
//! Each [`Profile`] owns a fixed, ordered rule table. Scoring evaluates every
//! criterion of the table independently, applies the criterion weight, and
//! sums the results. The engine holds configuration only and performs no I/O.

mod classifiers;
mod config;
mod domain;
mod rules;

#[cfg(test)]
mod tests;

pub use classifiers::{
    classify_at_least, classify_at_most, classify_departure_time, classify_first_visit_time,
    classify_out_of_stock_alt, classify_percentage_band, classify_within_threshold,
};
pub use config::{OosScale, ScoringConfig};
pub use domain::{
    parse_time_of_day, BreakageStatus, Criterion, Metric, MetricInput, Profile, UnknownProfile,
};

use rules::{rule_table, score_criterion};
use serde::{Deserialize, Serialize};

/// Stateless evaluator that applies the profile rule tables to metric inputs.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(
        &self,
        profile: Profile,
        input: &MetricInput,
    ) -> Result<ScoreBreakdown, ScoringError> {
        let components = rule_table(profile)
            .iter()
            .map(|rule| {
                score_criterion(profile, rule, input, &self.config).map(|points| ScoreComponent {
                    criterion: rule.criterion,
                    label: rule.criterion.label().to_string(),
                    points,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = components.iter().map(|component| component.points).sum();

        Ok(ScoreBreakdown {
            profile,
            components,
            total,
        })
    }

    /// Criteria scored for a profile, in breakdown order.
    pub fn criteria(profile: Profile) -> Vec<Criterion> {
        rule_table(profile).iter().map(|rule| rule.criterion).collect()
    }

    /// Inputs a profile needs before it can be scored.
    pub fn required_metrics(profile: Profile) -> Vec<Metric> {
        rule_table(profile)
            .iter()
            .flat_map(|rule| rule.criterion.metrics().iter().copied())
            .collect()
    }

    /// Best achievable total, summed from the top level of each criterion.
    pub fn max_total(profile: Profile) -> f64 {
        rule_table(profile).iter().map(|rule| rule.max_points()).sum()
    }
}

/// Points awarded for a single criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub criterion: Criterion,
    pub label: String,
    pub points: f64,
}

/// Ordered per-criterion points and their total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub profile: Profile,
    pub components: Vec<ScoreComponent>,
    pub total: f64,
}

impl ScoreBreakdown {
    /// Text persisted alongside the record, e.g. `Departure:10 | FillRate:25`.
    pub fn summary(&self) -> String {
        self.components
            .iter()
            .map(|component| format!("{}:{}", component.label, format_points(component.points)))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn points_for(&self, criterion: Criterion) -> Option<f64> {
        self.components
            .iter()
            .find(|component| component.criterion == criterion)
            .map(|component| component.points)
    }
}

/// Whole numbers print bare, fractional points keep one decimal.
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{points:.0}")
    } else {
        format!("{points:.1}")
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("unknown site archetype '{0}'")]
    UnknownArchetype(String),
    #[error("{profile} evaluation is missing the {metric}")]
    MissingMetric { profile: Profile, metric: Metric },
}
