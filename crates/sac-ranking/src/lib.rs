//! Performance ranking for SAC field-operations supervisors.
//!
//! The [`scoring`] module holds the rules engine that turns a profile's raw
//! metrics into points. [`evaluations`] persists scored evaluations and
//! exposes the submission and admin flows, and [`leaderboard`] ranks the
//! stored history by month or by yearly average.

pub mod config;
pub mod error;
pub mod evaluations;
pub mod leaderboard;
pub mod scoring;
pub mod telemetry;
