use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scoring::{MetricInput, Profile};

/// Column order of the persisted table. Appends are positional.
pub const RECORD_COLUMNS: [&str; 9] = [
    "Month",
    "Year",
    "EmployeeName",
    "Site",
    "Zone",
    "Profile",
    "TotalScore",
    "BreakdownText",
    "RegisteredDate",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::January,
            Self::February,
            Self::March,
            Self::April,
            Self::May,
            Self::June,
            Self::July,
            Self::August,
            Self::September,
            Self::October,
            Self::November,
            Self::December,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    const fn spanish_label(self) -> &'static str {
        match self {
            Self::January => "Enero",
            Self::February => "Febrero",
            Self::March => "Marzo",
            Self::April => "Abril",
            Self::May => "Mayo",
            Self::June => "Junio",
            Self::July => "Julio",
            Self::August => "Agosto",
            Self::September => "Septiembre",
            Self::October => "Octubre",
            Self::November => "Noviembre",
            Self::December => "Diciembre",
        }
    }

    /// One-based calendar number.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_number(number: u32) -> Option<Self> {
        Self::ordered().get(number.checked_sub(1)? as usize).copied()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Ok(number) = trimmed.parse::<u32>() {
            return Month::from_number(number).ok_or_else(|| format!("invalid month '{raw}'"));
        }
        Month::ordered()
            .into_iter()
            .find(|month| {
                trimmed.eq_ignore_ascii_case(month.label())
                    || trimmed.eq_ignore_ascii_case(month.spanish_label())
            })
            .ok_or_else(|| format!("invalid month '{raw}'"))
    }
}

/// Persisted outcome of one submitted evaluation.
///
/// Records carry no identifier; the same person and period may appear more
/// than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub month: Month,
    pub year: i32,
    pub employee_name: String,
    pub site: String,
    pub zone: String,
    pub profile: Profile,
    pub total_score: f64,
    pub breakdown: String,
    pub registered_on: NaiveDate,
}

/// Form payload for a new evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSubmission {
    pub employee_name: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub zone: String,
    pub profile: Profile,
    pub month: Month,
    pub year: i32,
    #[serde(default)]
    pub metrics: MetricInput,
}
