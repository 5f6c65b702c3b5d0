use super::classifiers::{
    classify_at_least, classify_at_most, classify_departure_time, classify_first_visit_time,
    classify_percentage_band, classify_within_threshold,
};
use super::config::ScoringConfig;
use super::domain::{BreakageStatus, Criterion, Metric, MetricInput, Profile};
use super::ScoringError;

/// Classifier selected for one criterion of a rule table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Rule {
    DepartureTime,
    FirstVisitTime,
    /// Percentage input scored against `(threshold, points)` pairs, highest
    /// threshold first.
    AtLeast {
        metric: Metric,
        bands: &'static [(f64, f64)],
    },
    OutOfStock { high: f64, mid: f64 },
    Shrink { high: f64, mid: f64 },
    Inventory { points: f64 },
    Breakage { points: f64 },
    /// `(ceiling, points)` pairs, lowest ceiling first.
    AtMost(&'static [(u32, f64)]),
}

impl Rule {
    fn top_points(self) -> f64 {
        match self {
            Rule::DepartureTime | Rule::FirstVisitTime => 10.0,
            Rule::AtLeast { bands, .. } => bands.first().map(|(_, points)| *points).unwrap_or(0.0),
            Rule::OutOfStock { high, .. } | Rule::Shrink { high, .. } => high,
            Rule::Inventory { points } | Rule::Breakage { points } => points,
            Rule::AtMost(bands) => bands.first().map(|(_, points)| *points).unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CriterionRule {
    pub criterion: Criterion,
    pub rule: Rule,
    pub weight: f64,
}

impl CriterionRule {
    pub fn max_points(&self) -> f64 {
        self.rule.top_points() * self.weight
    }
}

const fn criterion(criterion: Criterion, rule: Rule) -> CriterionRule {
    weighted(criterion, rule, 1.0)
}

const fn weighted(criterion: Criterion, rule: Rule, weight: f64) -> CriterionRule {
    CriterionRule {
        criterion,
        rule,
        weight,
    }
}

const fn at_least(metric: Metric, bands: &'static [(f64, f64)]) -> Rule {
    Rule::AtLeast { metric, bands }
}

const MIXED_FILL_RATE: &[(f64, f64)] = &[(98.0, 25.0), (97.0, 15.0), (96.0, 5.0)];
const STANDARD_PROXIMITY: &[(f64, f64)] = &[(98.0, 10.0), (97.0, 7.0), (96.0, 5.0)];
const DELIVERY_FILL_RATE: &[(f64, f64)] = &[(98.0, 40.0), (97.0, 24.0), (96.0, 8.0)];
const DELIVERY_PROXIMITY: &[(f64, f64)] = &[(98.0, 20.0), (97.0, 12.0), (96.0, 4.0)];
const GARRAFON_PERFECT_DELIVERY: &[(f64, f64)] = &[(98.0, 40.0), (97.0, 20.0), (95.0, 5.0)];
const GARRAFON_FALSEO: &[(u32, f64)] = &[(3, 20.0), (7, 10.0)];

const MIXED_SUPERVISOR: &[CriterionRule] = &[
    criterion(Criterion::Departure, Rule::DepartureTime),
    criterion(Criterion::FirstVisit, Rule::FirstVisitTime),
    criterion(Criterion::FillRate, at_least(Metric::FillRate, MIXED_FILL_RATE)),
    criterion(Criterion::Proximity, at_least(Metric::Proximity, STANDARD_PROXIMITY)),
    criterion(Criterion::Inventory, Rule::Inventory { points: 25.0 }),
    criterion(Criterion::Shrink, Rule::Shrink { high: 10.0, mid: 5.0 }),
    criterion(Criterion::Breakage, Rule::Breakage { points: 10.0 }),
];

const DELIVERY_SUPERVISOR: &[CriterionRule] = &[
    weighted(Criterion::Departure, Rule::DepartureTime, 2.0),
    weighted(Criterion::FirstVisit, Rule::FirstVisitTime, 2.0),
    criterion(Criterion::FillRate, at_least(Metric::FillRate, DELIVERY_FILL_RATE)),
    criterion(Criterion::Proximity, at_least(Metric::Proximity, DELIVERY_PROXIMITY)),
];

const APT_SUPERVISOR: &[CriterionRule] = &[
    criterion(Criterion::OutOfStock, Rule::OutOfStock { high: 20.0, mid: 10.0 }),
    criterion(Criterion::Inventory, Rule::Inventory { points: 40.0 }),
    criterion(Criterion::Shrink, Rule::Shrink { high: 20.0, mid: 10.0 }),
    criterion(Criterion::Breakage, Rule::Breakage { points: 20.0 }),
];

const GARRAFON_TEAM_LEAD: &[CriterionRule] = &[
    weighted(Criterion::Departure, Rule::DepartureTime, 1.5),
    weighted(Criterion::FirstVisit, Rule::FirstVisitTime, 1.5),
    criterion(
        Criterion::PerfectDelivery,
        at_least(Metric::PerfectDelivery, GARRAFON_PERFECT_DELIVERY),
    ),
    criterion(Criterion::Proximity, at_least(Metric::Proximity, STANDARD_PROXIMITY)),
    criterion(Criterion::Falseo, Rule::AtMost(GARRAFON_FALSEO)),
];

const APT_GARRAFON_EMBOTTLED_SUPERVISOR: &[CriterionRule] = &[
    criterion(Criterion::OutOfStock, Rule::OutOfStock { high: 20.0, mid: 10.0 }),
    criterion(Criterion::Inventory, Rule::Inventory { points: 30.0 }),
    criterion(Criterion::Shrink, Rule::Shrink { high: 20.0, mid: 10.0 }),
    criterion(Criterion::Breakage, Rule::Breakage { points: 20.0 }),
    criterion(Criterion::Departure, Rule::DepartureTime),
];

const APT_EMBOTTLED_SUPERVISOR: &[CriterionRule] = &[
    criterion(Criterion::OutOfStock, Rule::OutOfStock { high: 25.0, mid: 12.0 }),
    criterion(Criterion::Inventory, Rule::Inventory { points: 40.0 }),
    criterion(Criterion::Shrink, Rule::Shrink { high: 25.0, mid: 12.0 }),
    criterion(Criterion::Departure, Rule::DepartureTime),
];

/// Ordered rule table for a profile. Breakdowns follow this order.
pub(crate) fn rule_table(profile: Profile) -> &'static [CriterionRule] {
    match profile {
        Profile::MixedSupervisor => MIXED_SUPERVISOR,
        Profile::DeliverySupervisor | Profile::EmbottledTeamLead => DELIVERY_SUPERVISOR,
        Profile::AptSupervisor => APT_SUPERVISOR,
        Profile::GarrafonTeamLead => GARRAFON_TEAM_LEAD,
        Profile::AptGarrafonEmbottledSupervisor => APT_GARRAFON_EMBOTTLED_SUPERVISOR,
        Profile::AptEmbottledSupervisor => APT_EMBOTTLED_SUPERVISOR,
    }
}

/// Weighted points for one criterion.
pub(crate) fn score_criterion(
    profile: Profile,
    rule: &CriterionRule,
    input: &MetricInput,
    config: &ScoringConfig,
) -> Result<f64, ScoringError> {
    let require = |value: Option<f64>, metric: Metric| {
        value.ok_or(ScoringError::MissingMetric { profile, metric })
    };

    let points = match rule.rule {
        Rule::DepartureTime => {
            let time = input
                .departure_time
                .ok_or(ScoringError::MissingMetric {
                    profile,
                    metric: Metric::DepartureTime,
                })?;
            classify_departure_time(time)
        }
        Rule::FirstVisitTime => {
            let time = input
                .first_visit_time
                .ok_or(ScoringError::MissingMetric {
                    profile,
                    metric: Metric::FirstVisitTime,
                })?;
            classify_first_visit_time(time)
        }
        Rule::AtLeast { metric, bands } => {
            classify_at_least(require(percentage_input(input, metric), metric)?, bands)
        }
        Rule::OutOfStock { high, mid } => {
            let value = require(input.out_of_stock, Metric::OutOfStock)?;
            config.oos_scale(profile).classify(value, high, mid)
        }
        Rule::Shrink { high, mid } => {
            let value = require(input.shrink_rate, Metric::ShrinkRate)?;
            classify_percentage_band(value, high, mid)
        }
        Rule::Inventory { points } => {
            let key = input
                .archetype
                .as_deref()
                .filter(|key| !key.trim().is_empty())
                .ok_or(ScoringError::MissingMetric {
                    profile,
                    metric: Metric::Archetype,
                })?;
            let threshold = config
                .archetype_threshold(key)
                .ok_or_else(|| ScoringError::UnknownArchetype(key.trim().to_string()))?;
            let amount = require(input.inventory_variance, Metric::InventoryVariance)?;
            classify_within_threshold(amount, threshold, points)
        }
        Rule::Breakage { points } => match input.breakage {
            Some(BreakageStatus::OnTarget) => points,
            Some(BreakageStatus::OffTarget) => 0.0,
            None => {
                return Err(ScoringError::MissingMetric {
                    profile,
                    metric: Metric::Breakage,
                })
            }
        },
        Rule::AtMost(bands) => {
            let count = input.falseo_count.ok_or(ScoringError::MissingMetric {
                profile,
                metric: Metric::FalseoCount,
            })?;
            classify_at_most(count, bands)
        }
    };

    Ok(points * rule.weight)
}

/// Value read by a percentage band rule. Inputs outside the percentage family
/// never carry a band table and read as absent.
fn percentage_input(input: &MetricInput, metric: Metric) -> Option<f64> {
    match metric {
        Metric::FillRate => input.fill_rate,
        Metric::Proximity => input.proximity,
        Metric::PerfectDelivery => input.perfect_delivery,
        Metric::DepartureTime
        | Metric::FirstVisitTime
        | Metric::OutOfStock
        | Metric::InventoryVariance
        | Metric::Archetype
        | Metric::ShrinkRate
        | Metric::Breakage
        | Metric::FalseoCount => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_rules_read_an_input_of_their_own_criterion() {
        for profile in Profile::ordered() {
            for rule in rule_table(profile) {
                if let Rule::AtLeast { metric, .. } = rule.rule {
                    assert!(
                        rule.criterion.metrics().contains(&metric),
                        "{profile}: {:?} reads {metric}",
                        rule.criterion
                    );
                    assert!(percentage_input(&MetricInput::default(), metric).is_none());
                }
            }
        }
    }

    #[test]
    fn band_rule_reports_the_metric_it_reads() {
        let input = MetricInput {
            proximity: Some(99.0),
            ..MetricInput::default()
        };
        let fill_rate = rule_table(Profile::MixedSupervisor)
            .iter()
            .find(|rule| rule.criterion == Criterion::FillRate)
            .expect("mixed table scores fill rate");

        assert_eq!(
            score_criterion(
                Profile::MixedSupervisor,
                fill_rate,
                &input,
                &ScoringConfig::default()
            ),
            Err(ScoringError::MissingMetric {
                profile: Profile::MixedSupervisor,
                metric: Metric::FillRate,
            })
        );
    }
}
