use serde::{Deserialize, Serialize};

use crate::evaluations::EvaluationRecord;
use crate::scoring::Profile;

/// Year selection plus optional facet selections.
///
/// An empty facet list lets every value through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardFilter {
    pub year: i32,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub zones: Vec<String>,
    #[serde(default)]
    pub sites: Vec<String>,
}

impl LeaderboardFilter {
    pub fn for_year(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    pub fn with_profiles(mut self, profiles: impl IntoIterator<Item = Profile>) -> Self {
        self.profiles = profiles.into_iter().collect();
        self
    }

    pub fn with_zones<S: Into<String>>(mut self, zones: impl IntoIterator<Item = S>) -> Self {
        self.zones = zones.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sites<S: Into<String>>(mut self, sites: impl IntoIterator<Item = S>) -> Self {
        self.sites = sites.into_iter().map(Into::into).collect();
        self
    }

    pub fn matches(&self, record: &EvaluationRecord) -> bool {
        record.year == self.year
            && self.matches_profile(record)
            && self.matches_zone(record)
            && self.matches_site(record)
    }

    fn matches_profile(&self, record: &EvaluationRecord) -> bool {
        self.profiles.is_empty() || self.profiles.contains(&record.profile)
    }

    fn matches_zone(&self, record: &EvaluationRecord) -> bool {
        self.zones.is_empty() || self.zones.iter().any(|zone| zone == &record.zone)
    }

    fn matches_site(&self, record: &EvaluationRecord) -> bool {
        self.sites.is_empty() || self.sites.iter().any(|site| site == &record.site)
    }
}

/// Facet values offered to the user for the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub profiles: Vec<Profile>,
    pub zones: Vec<String>,
    pub sites: Vec<String>,
}

/// Distinct years in first-seen order.
pub fn available_years(records: &[EvaluationRecord]) -> Vec<i32> {
    let mut years = Vec::new();
    for record in records {
        if !years.contains(&record.year) {
            years.push(record.year);
        }
    }
    years
}

/// Cascading facet options: profiles come from the year slice, zones from the
/// profile-filtered slice, and sites from the zone-filtered slice.
pub fn filter_options(records: &[EvaluationRecord], filter: &LeaderboardFilter) -> FilterOptions {
    let by_year: Vec<&EvaluationRecord> = records
        .iter()
        .filter(|record| record.year == filter.year)
        .collect();
    let profiles = distinct(by_year.iter().map(|record| record.profile));

    let by_profile: Vec<&EvaluationRecord> = by_year
        .into_iter()
        .filter(|record| filter.matches_profile(record))
        .collect();
    let zones = distinct(by_profile.iter().map(|record| record.zone.clone()));

    let by_zone = by_profile
        .into_iter()
        .filter(|record| filter.matches_zone(record));
    let sites = distinct(by_zone.map(|record| record.site.clone()));

    FilterOptions {
        profiles,
        zones,
        sites,
    }
}

fn distinct<T: PartialEq>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
