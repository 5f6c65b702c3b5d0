use serde::Serialize;

use crate::evaluations::Month;
use crate::scoring::Profile;

/// Position badge shown next to a leaderboard row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMarker {
    Gold,
    Silver,
    Bronze,
    Crown,
    Star,
    Numbered(usize),
}

impl RankMarker {
    pub const fn monthly(rank: usize) -> Self {
        match rank {
            1 => Self::Gold,
            2 => Self::Silver,
            3 => Self::Bronze,
            other => Self::Numbered(other),
        }
    }

    pub const fn annual(rank: usize) -> Self {
        match rank {
            1 => Self::Crown,
            2 | 3 => Self::Star,
            other => Self::Numbered(other),
        }
    }

    pub fn symbol(self) -> String {
        match self {
            Self::Gold => "🥇".to_string(),
            Self::Silver => "🥈".to_string(),
            Self::Bronze => "🥉".to_string(),
            Self::Crown => "👑".to_string(),
            Self::Star => "⭐".to_string(),
            Self::Numbered(rank) => format!("#{rank}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyEntry {
    pub rank: usize,
    pub marker: RankMarker,
    pub employee_name: String,
    pub profile: Profile,
    pub profile_label: &'static str,
    pub site: String,
    pub zone: String,
    pub total_score: f64,
    pub breakdown: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyLeaderboard {
    pub year: i32,
    pub month: Month,
    pub entries: Vec<MonthlyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualEntry {
    pub rank: usize,
    pub marker: RankMarker,
    pub employee_name: String,
    pub profile: Profile,
    pub profile_label: &'static str,
    pub site: String,
    pub zone: String,
    pub mean_score: f64,
    pub evaluations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualLeaderboard {
    pub year: i32,
    pub entries: Vec<AnnualEntry>,
}
