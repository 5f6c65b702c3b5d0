//! Point classifiers shared by the profile rule tables.
//!
//! Every classifier is total over its input domain: it returns a points value
//! for any input and never fails.

use chrono::{NaiveTime, Timelike};

/// (hour, minute, points) cutoffs, earliest first.
const DEPARTURE_CUTOFFS: [(u32, u32, f64); 3] = [(7, 30, 10.0), (8, 0, 5.0), (9, 0, 2.0)];
const FIRST_VISIT_CUTOFFS: [(u32, u32, f64); 3] = [(8, 30, 10.0), (9, 0, 5.0), (10, 0, 2.0)];

/// Route departure: earlier is better, cutoffs inclusive.
pub fn classify_departure_time(time: NaiveTime) -> f64 {
    classify_clock(time, &DEPARTURE_CUTOFFS)
}

/// First customer visit: earlier is better, cutoffs inclusive.
pub fn classify_first_visit_time(time: NaiveTime) -> f64 {
    classify_clock(time, &FIRST_VISIT_CUTOFFS)
}

/// Fraction-of-one bands used for shrink (0.05 = 5%).
pub fn classify_percentage_band(value: f64, high_points: f64, mid_points: f64) -> f64 {
    if value <= 0.05 {
        high_points
    } else if value <= 0.10 {
        mid_points
    } else {
        0.0
    }
}

/// Percentage-point bands used for out-of-stock (0.5 = half a percent).
pub fn classify_out_of_stock_alt(value: f64, high_points: f64, mid_points: f64) -> f64 {
    if value <= 0.5 {
        high_points
    } else if value <= 1.0 {
        mid_points
    } else {
        0.0
    }
}

/// Step function over `>=` thresholds listed from highest to lowest.
pub fn classify_at_least(value: f64, bands: &[(f64, f64)]) -> f64 {
    bands
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}

/// Step function over inclusive `<=` count ceilings listed from lowest to highest.
pub fn classify_at_most(count: u32, bands: &[(u32, f64)]) -> f64 {
    bands
        .iter()
        .find(|(ceiling, _)| count <= *ceiling)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}

/// All-or-nothing check of an inventory variance against its tolerance.
pub fn classify_within_threshold(amount: f64, threshold: f64, points: f64) -> f64 {
    if amount <= threshold {
        points
    } else {
        0.0
    }
}

fn classify_clock(time: NaiveTime, cutoffs: &[(u32, u32, f64)]) -> f64 {
    let seconds = time.num_seconds_from_midnight();
    cutoffs
        .iter()
        .find(|(hour, minute, _)| seconds <= hour * 3600 + minute * 60)
        .map(|(_, _, points)| *points)
        .unwrap_or(0.0)
}
