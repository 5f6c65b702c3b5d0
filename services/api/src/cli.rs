use crate::commands::{
    run_annual_leaderboard, run_export, run_monthly_leaderboard, run_score, AnnualArgs,
    ExportArgs, MonthlyArgs, ScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sac_ranking::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "SAC Ranking",
    about = "Score SAC supervisor evaluations and publish monthly and annual rankings",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score an evaluation submission read from a JSON file
    Score(ScoreArgs),
    /// Print a leaderboard from the configured record store
    Leaderboard {
        #[command(subcommand)]
        command: LeaderboardCommand,
    },
    /// Write the full record table as CSV
    Export(ExportArgs),
}

#[derive(Subcommand, Debug)]
enum LeaderboardCommand {
    /// Ranking for one month of one year
    Monthly(MonthlyArgs),
    /// Yearly ranking by average score per employee
    Annual(AnnualArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Leaderboard {
            command: LeaderboardCommand::Monthly(args),
        } => run_monthly_leaderboard(args),
        Command::Leaderboard {
            command: LeaderboardCommand::Annual(args),
        } => run_annual_leaderboard(args),
        Command::Export(args) => run_export(args),
    }
}
