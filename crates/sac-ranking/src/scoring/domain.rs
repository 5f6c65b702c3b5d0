use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Supervisor role whose rule table governs an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    MixedSupervisor,
    DeliverySupervisor,
    EmbottledTeamLead,
    AptSupervisor,
    GarrafonTeamLead,
    AptGarrafonEmbottledSupervisor,
    AptEmbottledSupervisor,
}

impl Profile {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::MixedSupervisor,
            Self::DeliverySupervisor,
            Self::EmbottledTeamLead,
            Self::AptSupervisor,
            Self::GarrafonTeamLead,
            Self::AptGarrafonEmbottledSupervisor,
            Self::AptEmbottledSupervisor,
        ]
    }

    /// Label written to the record store and shown on leaderboards.
    pub const fn label(self) -> &'static str {
        match self {
            Self::MixedSupervisor => "Mixed Supervisor",
            Self::DeliverySupervisor => "Delivery Supervisor",
            Self::EmbottledTeamLead => "Embottled Team Lead",
            Self::AptSupervisor => "APT Supervisor",
            Self::GarrafonTeamLead => "Garrafon Team Lead",
            Self::AptGarrafonEmbottledSupervisor => "APT Garrafon/Embottled Supervisor",
            Self::AptEmbottledSupervisor => "APT Embottled Supervisor",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::MixedSupervisor => "mixed_supervisor",
            Self::DeliverySupervisor => "delivery_supervisor",
            Self::EmbottledTeamLead => "embottled_team_lead",
            Self::AptSupervisor => "apt_supervisor",
            Self::GarrafonTeamLead => "garrafon_team_lead",
            Self::AptGarrafonEmbottledSupervisor => "apt_garrafon_embottled_supervisor",
            Self::AptEmbottledSupervisor => "apt_embottled_supervisor",
        }
    }

    /// Job titles used by the sheets that predate this crate.
    const fn legacy_label(self) -> &'static str {
        match self {
            Self::MixedSupervisor => "Jefe SAC Mixto",
            Self::DeliverySupervisor => "Jefe SAC Entrega",
            Self::EmbottledTeamLead => "JT Embotellado",
            Self::AptSupervisor => "Jefe SAC APT",
            Self::GarrafonTeamLead => "JT Garrafón",
            Self::AptGarrafonEmbottledSupervisor => "Jefe/Sup APT Garrafón/embotellado",
            Self::AptEmbottledSupervisor => "Jefe/Sup APT Embotellado",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown profile '{0}'")]
pub struct UnknownProfile(pub String);

impl FromStr for Profile {
    type Err = UnknownProfile;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Profile::ordered()
            .into_iter()
            .find(|profile| {
                trimmed.eq_ignore_ascii_case(profile.label())
                    || trimmed.eq_ignore_ascii_case(profile.key())
                    || trimmed.eq_ignore_ascii_case(profile.legacy_label())
            })
            .ok_or_else(|| UnknownProfile(trimmed.to_string()))
    }
}

/// Individual input captured by the evaluation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    DepartureTime,
    FirstVisitTime,
    FillRate,
    Proximity,
    PerfectDelivery,
    OutOfStock,
    InventoryVariance,
    Archetype,
    ShrinkRate,
    Breakage,
    FalseoCount,
}

impl Metric {
    pub const fn label(self) -> &'static str {
        match self {
            Self::DepartureTime => "route departure time",
            Self::FirstVisitTime => "first customer visit time",
            Self::FillRate => "fill rate",
            Self::Proximity => "proximity",
            Self::PerfectDelivery => "perfect delivery",
            Self::OutOfStock => "out-of-stock",
            Self::InventoryVariance => "inventory variance amount",
            Self::Archetype => "site archetype",
            Self::ShrinkRate => "shrink rate",
            Self::Breakage => "breakage status",
            Self::FalseoCount => "falseo count",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scored line item of a profile's rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Departure,
    FirstVisit,
    FillRate,
    Proximity,
    PerfectDelivery,
    OutOfStock,
    Inventory,
    Shrink,
    Breakage,
    Falseo,
}

impl Criterion {
    /// Short label used in the persisted breakdown text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Departure => "Departure",
            Self::FirstVisit => "FirstVisit",
            Self::FillRate => "FillRate",
            Self::Proximity => "Proximity",
            Self::PerfectDelivery => "PerfectDelivery",
            Self::OutOfStock => "OOS",
            Self::Inventory => "Inventory",
            Self::Shrink => "Shrink",
            Self::Breakage => "Breakage",
            Self::Falseo => "Falseo",
        }
    }

    /// Inputs the criterion reads.
    pub const fn metrics(self) -> &'static [Metric] {
        match self {
            Self::Departure => &[Metric::DepartureTime],
            Self::FirstVisit => &[Metric::FirstVisitTime],
            Self::FillRate => &[Metric::FillRate],
            Self::Proximity => &[Metric::Proximity],
            Self::PerfectDelivery => &[Metric::PerfectDelivery],
            Self::OutOfStock => &[Metric::OutOfStock],
            Self::Inventory => &[Metric::Archetype, Metric::InventoryVariance],
            Self::Shrink => &[Metric::ShrinkRate],
            Self::Breakage => &[Metric::Breakage],
            Self::Falseo => &[Metric::FalseoCount],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakageStatus {
    OnTarget,
    OffTarget,
}

/// Raw values entered for one evaluation.
///
/// Every field is optional so one payload shape serves all profiles; which
/// fields are required depends on the profile's rule table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricInput {
    #[serde(default, with = "time_of_day", skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<NaiveTime>,
    #[serde(default, with = "time_of_day", skip_serializing_if = "Option::is_none")]
    pub first_visit_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proximity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perfect_delivery: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_of_stock: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_variance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shrink_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakage: Option<BreakageStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub falseo_count: Option<u32>,
}

impl MetricInput {
    pub fn has(&self, metric: Metric) -> bool {
        match metric {
            Metric::DepartureTime => self.departure_time.is_some(),
            Metric::FirstVisitTime => self.first_visit_time.is_some(),
            Metric::FillRate => self.fill_rate.is_some(),
            Metric::Proximity => self.proximity.is_some(),
            Metric::PerfectDelivery => self.perfect_delivery.is_some(),
            Metric::OutOfStock => self.out_of_stock.is_some(),
            Metric::InventoryVariance => self.inventory_variance.is_some(),
            Metric::Archetype => self
                .archetype
                .as_deref()
                .map(|key| !key.trim().is_empty())
                .unwrap_or(false),
            Metric::ShrinkRate => self.shrink_rate.is_some(),
            Metric::Breakage => self.breakage.is_some(),
            Metric::FalseoCount => self.falseo_count.is_some(),
        }
    }
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, String> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|err| format!("failed to parse '{raw}' as HH:MM ({err})"))
}

mod time_of_day {
    use super::*;

    pub(super) fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) if time.second() == 0 => {
                serializer.serialize_str(&time.format("%H:%M").to_string())
            }
            Some(time) => serializer.serialize_str(&time.format("%H:%M:%S").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<String>::deserialize(deserializer)?;
        opt.filter(|value| !value.trim().is_empty())
            .map(|value| parse_time_of_day(&value).map_err(serde::de::Error::custom))
            .transpose()
    }
}
