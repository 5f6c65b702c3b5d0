//! Monthly and annual rankings over stored evaluations.
//!
//! Both views sort by score descending with a stable sort, so equal scores
//! keep their stored order (monthly) or first-seen group order (annual).

mod filter;
pub mod views;

pub use filter::{available_years, filter_options, FilterOptions, LeaderboardFilter};
pub use views::{
    AnnualEntry, AnnualLeaderboard, MonthlyEntry, MonthlyLeaderboard, RankMarker,
};

use crate::evaluations::{EvaluationRecord, Month};
use crate::scoring::Profile;

pub fn monthly(
    records: &[EvaluationRecord],
    filter: &LeaderboardFilter,
    month: Month,
) -> MonthlyLeaderboard {
    let mut selected: Vec<&EvaluationRecord> = records
        .iter()
        .filter(|record| filter.matches(record) && record.month == month)
        .collect();
    selected.sort_by(|left, right| right.total_score.total_cmp(&left.total_score));

    let entries = selected
        .into_iter()
        .enumerate()
        .map(|(index, record)| MonthlyEntry {
            rank: index + 1,
            marker: RankMarker::monthly(index + 1),
            employee_name: record.employee_name.clone(),
            profile: record.profile,
            profile_label: record.profile.label(),
            site: record.site.clone(),
            zone: record.zone.clone(),
            total_score: record.total_score,
            breakdown: record.breakdown.clone(),
        })
        .collect();

    MonthlyLeaderboard {
        year: filter.year,
        month,
        entries,
    }
}

struct AnnualGroup<'a> {
    employee_name: &'a str,
    profile: Profile,
    site: &'a str,
    zone: &'a str,
    sum: f64,
    count: usize,
}

impl AnnualGroup<'_> {
    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

pub fn annual(records: &[EvaluationRecord], filter: &LeaderboardFilter) -> AnnualLeaderboard {
    let mut groups: Vec<AnnualGroup<'_>> = Vec::new();
    for record in records.iter().filter(|record| filter.matches(record)) {
        let existing = groups.iter_mut().find(|group| {
            group.employee_name == record.employee_name
                && group.profile == record.profile
                && group.site == record.site
                && group.zone == record.zone
        });
        match existing {
            Some(group) => {
                group.sum += record.total_score;
                group.count += 1;
            }
            None => groups.push(AnnualGroup {
                employee_name: &record.employee_name,
                profile: record.profile,
                site: &record.site,
                zone: &record.zone,
                sum: record.total_score,
                count: 1,
            }),
        }
    }

    groups.sort_by(|left, right| right.mean().total_cmp(&left.mean()));

    let entries = groups
        .into_iter()
        .enumerate()
        .map(|(index, group)| AnnualEntry {
            rank: index + 1,
            marker: RankMarker::annual(index + 1),
            employee_name: group.employee_name.to_string(),
            profile: group.profile,
            profile_label: group.profile.label(),
            site: group.site.to_string(),
            zone: group.zone.to_string(),
            mean_score: group.mean(),
            evaluations: group.count,
        })
        .collect();

    AnnualLeaderboard {
        year: filter.year,
        entries,
    }
}
