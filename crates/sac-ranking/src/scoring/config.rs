use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::classifiers::{classify_out_of_stock_alt, classify_percentage_band};
use super::domain::Profile;

/// Input scale of the out-of-stock metric.
///
/// Revisions of the evaluation form disagree on whether OOS is entered as a
/// fraction (0.05 = 5%) or in percentage points (0.5 = half a percent). The
/// scale is configured per profile until product settles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OosScale {
    Fraction,
    PercentagePoints,
}

impl OosScale {
    pub fn classify(self, value: f64, high_points: f64, mid_points: f64) -> f64 {
        match self {
            Self::Fraction => classify_percentage_band(value, high_points, mid_points),
            Self::PercentagePoints => classify_out_of_stock_alt(value, high_points, mid_points),
        }
    }

    /// Largest value a well-formed input can take on this scale.
    pub const fn upper_bound(self) -> f64 {
        match self {
            Self::Fraction => 1.0,
            Self::PercentagePoints => 100.0,
        }
    }
}

impl FromStr for OosScale {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fraction" | "decimal" => Ok(Self::Fraction),
            "percentage_points" | "percent" | "percentage" => Ok(Self::PercentagePoints),
            other => Err(format!(
                "unknown OOS scale '{other}' (expected fraction or percentage_points)"
            )),
        }
    }
}

/// Configuration consumed by the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Inventory variance tolerance by site archetype key.
    pub archetype_thresholds: BTreeMap<String, f64>,
    pub default_oos_scale: OosScale,
    #[serde(default)]
    pub oos_scale_overrides: BTreeMap<Profile, OosScale>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let archetype_thresholds = [
            ("E", 500.0),
            ("D", 1_000.0),
            ("C", 2_000.0),
            ("B", 4_000.0),
            ("A", 10_000.0),
        ]
        .into_iter()
        .map(|(key, threshold)| (key.to_string(), threshold))
        .collect();

        Self {
            archetype_thresholds,
            default_oos_scale: OosScale::PercentagePoints,
            oos_scale_overrides: BTreeMap::new(),
        }
    }
}

impl ScoringConfig {
    pub fn oos_scale(&self, profile: Profile) -> OosScale {
        self.oos_scale_overrides
            .get(&profile)
            .copied()
            .unwrap_or(self.default_oos_scale)
    }

    pub fn with_oos_scale(mut self, profile: Profile, scale: OosScale) -> Self {
        self.oos_scale_overrides.insert(profile, scale);
        self
    }

    /// Looks up an archetype key, ignoring surrounding whitespace and case.
    pub fn archetype_threshold(&self, key: &str) -> Option<f64> {
        let key = key.trim();
        self.archetype_thresholds
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
            .map(|(_, threshold)| *threshold)
    }

    /// Applies a scale directive such as `fraction` or
    /// `apt_supervisor=fraction,apt_embottled_supervisor=percentage_points`.
    pub fn apply_oos_directive(&mut self, directive: &str) -> Result<(), String> {
        for part in directive.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            match part.split_once('=') {
                Some((profile, scale)) => {
                    let profile = profile
                        .parse::<Profile>()
                        .map_err(|err| err.to_string())?;
                    self.oos_scale_overrides.insert(profile, scale.parse()?);
                }
                None => self.default_oos_scale = part.parse()?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_archetypes_cover_five_tiers() {
        let config = ScoringConfig::default();
        assert_eq!(config.archetype_threshold("E"), Some(500.0));
        assert_eq!(config.archetype_threshold(" a "), Some(10_000.0));
        assert_eq!(config.archetype_threshold("F"), None);
    }

    #[test]
    fn directive_sets_default_and_overrides() {
        let mut config = ScoringConfig::default();
        config
            .apply_oos_directive("fraction, apt_embottled_supervisor=percentage_points")
            .expect("directive parses");

        assert_eq!(config.oos_scale(Profile::AptSupervisor), OosScale::Fraction);
        assert_eq!(
            config.oos_scale(Profile::AptEmbottledSupervisor),
            OosScale::PercentagePoints
        );
    }

    #[test]
    fn directive_rejects_unknown_scale() {
        let mut config = ScoringConfig::default();
        assert!(config.apply_oos_directive("apt_supervisor=basis_points").is_err());
    }

    #[test]
    fn scales_classify_the_same_reading_differently() {
        assert_eq!(OosScale::Fraction.classify(0.5, 20.0, 10.0), 0.0);
        assert_eq!(OosScale::PercentagePoints.classify(0.5, 20.0, 10.0), 20.0);
    }
}
