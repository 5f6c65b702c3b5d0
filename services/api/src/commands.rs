use crate::infra::build_service;
use chrono::Local;
use clap::Args;
use sac_ranking::config::AppConfig;
use sac_ranking::error::AppError;
use sac_ranking::evaluations::{write_records, EvaluationSubmission, Month, RecordStoreError};
use sac_ranking::leaderboard::{AnnualLeaderboard, LeaderboardFilter, MonthlyLeaderboard};
use sac_ranking::scoring::{format_points, Profile, ScoreBreakdown, ScoringEngine};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding an evaluation submission
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Append the scored evaluation to the configured record store
    #[arg(long)]
    pub(crate) save: bool,
}

#[derive(Args, Debug)]
pub(crate) struct FilterArgs {
    /// Evaluation year to rank
    #[arg(long)]
    pub(crate) year: i32,
    /// Restrict to a profile (repeatable)
    #[arg(long)]
    pub(crate) profile: Vec<Profile>,
    /// Restrict to a zone (repeatable)
    #[arg(long)]
    pub(crate) zone: Vec<String>,
    /// Restrict to a site (repeatable)
    #[arg(long)]
    pub(crate) site: Vec<String>,
}

impl FilterArgs {
    fn into_filter(self) -> LeaderboardFilter {
        LeaderboardFilter::for_year(self.year)
            .with_profiles(self.profile)
            .with_zones(self.zone)
            .with_sites(self.site)
    }
}

#[derive(Args, Debug)]
pub(crate) struct MonthlyArgs {
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
    /// Month name or number
    #[arg(long)]
    pub(crate) month: Month,
}

#[derive(Args, Debug)]
pub(crate) struct AnnualArgs {
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Destination file; defaults to stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let raw = fs::read_to_string(&args.input)?;
    let submission: EvaluationSubmission = serde_json::from_str(&raw)?;
    let service = build_service(&config);

    let breakdown = service.preview(&submission)?;
    print!("{}", render_breakdown(&breakdown));

    if args.save {
        let record = service.submit(submission, Local::now().date_naive())?;
        println!(
            "Saved evaluation for {} ({} {})",
            record.employee_name, record.month, record.year
        );
    }
    Ok(())
}

pub(crate) fn run_monthly_leaderboard(args: MonthlyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config);
    let board = service.monthly_leaderboard(&args.filter.into_filter(), args.month)?;
    print!("{}", render_monthly(&board));
    Ok(())
}

pub(crate) fn run_annual_leaderboard(args: AnnualArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config);
    let board = service.annual_leaderboard(&args.filter.into_filter())?;
    print!("{}", render_annual(&board));
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config);
    let records = service.records()?;

    let mut buffer = Vec::new();
    write_records(&mut buffer, &records)
        .map_err(|err| AppError::Service(RecordStoreError::from(err).into()))?;

    match args.output {
        Some(path) => {
            fs::write(&path, &buffer)?;
            println!("Exported {} records to {}", records.len(), path.display());
        }
        None => print!("{}", String::from_utf8_lossy(&buffer)),
    }
    Ok(())
}

pub(crate) fn render_breakdown(breakdown: &ScoreBreakdown) -> String {
    let mut out = format!("Profile: {}\n", breakdown.profile.label());
    for component in &breakdown.components {
        out.push_str(&format!(
            "  - {:<16} {}\n",
            component.label,
            format_points(component.points)
        ));
    }
    out.push_str(&format!(
        "Total: {} / {}\n",
        format_points(breakdown.total),
        format_points(ScoringEngine::max_total(breakdown.profile))
    ));
    out
}

pub(crate) fn render_monthly(board: &MonthlyLeaderboard) -> String {
    let mut out = format!("Leaderboard {} {}\n", board.month, board.year);
    if board.entries.is_empty() {
        out.push_str("No evaluations recorded for this period.\n");
        return out;
    }
    for entry in &board.entries {
        out.push_str(&format!(
            "{} {} | {} | {} / {} | {}\n",
            entry.marker.symbol(),
            entry.employee_name,
            entry.profile_label,
            entry.site,
            entry.zone,
            format_points(entry.total_score)
        ));
    }
    out
}

pub(crate) fn render_annual(board: &AnnualLeaderboard) -> String {
    let mut out = format!("Annual leaderboard {}\n", board.year);
    if board.entries.is_empty() {
        out.push_str("No evaluations recorded for this year.\n");
        return out;
    }
    for entry in &board.entries {
        out.push_str(&format!(
            "{} {} | {} | {} / {} | avg {:.1} over {} evaluations\n",
            entry.marker.symbol(),
            entry.employee_name,
            entry.profile_label,
            entry.site,
            entry.zone,
            entry.mean_score,
            entry.evaluations
        ));
    }
    out
}
