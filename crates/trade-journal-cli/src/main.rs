mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use trade_journal_core::AnalyticsConfig;

use commands::export::{ExportCsvArgs, ImportCsvArgs};
use commands::goals::GoalArgs;
use commands::journal::{
    AnalyzeArgs, BreakdownArgs, BucketsArgs, ConfluenceArgs, EquityArgs, ListArgs, MoodArgs,
    StreaksArgs, WeeklyArgs,
};
use commands::risk::{ProjectionArgs, RiskOfRuinArgs};

/// Trading journal analytics
#[derive(Parser)]
#[command(
    name = "tj",
    version,
    about = "Trading journal analytics",
    long_about = "Derive performance analytics from a trading journal with decimal precision: \
                  equity curve, drawdown, streaks, day/hour/month win rates, confluence and \
                  mood statistics, risk of ruin, equity projection and CSV export."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Analytics config file (JSON, or YAML by extension)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every analytic and return the full journal report
    Analyze(AnalyzeArgs),
    /// Equity curve and maximum drawdown
    Equity(EquityArgs),
    /// Current and longest win/loss streaks
    Streaks(StreaksArgs),
    /// Win rates by weekday, hour or month
    Buckets(BucketsArgs),
    /// Win rate per confluence tag
    Confluence(ConfluenceArgs),
    /// Win rate per emotion
    Mood(MoodArgs),
    /// Outcome, pair or R-multiple breakdown
    Breakdown(BreakdownArgs),
    /// Risk-of-ruin table per risk level
    RiskOfRuin(RiskOfRuinArgs),
    /// Twelve-month equity projection
    Projection(ProjectionArgs),
    /// Monthly goal progress
    Goal(GoalArgs),
    /// Recap of one Monday-to-Sunday week
    Weekly(WeeklyArgs),
    /// List validated trades in time order
    List(ListArgs),
    /// Export the journal as CSV
    ExportCsv(ExportCsvArgs),
    /// Read a CSV export back into rows
    ImportCsv(ImportCsvArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn load_config(path: Option<&str>) -> Result<Option<AnalyticsConfig>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            let cfg: AnalyticsConfig = input::file::read_structured(p)?;
            tracing::debug!(path = p, "loaded analytics config");
            Ok(Some(cfg))
        }
        None => Ok(None),
    }
}

fn run(cli: Cli) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref())?;
    let cfg = config.as_ref();
    match cli.command {
        Commands::Analyze(args) => commands::journal::run_analyze(args, cfg),
        Commands::Equity(args) => commands::journal::run_equity(args, cfg),
        Commands::Streaks(args) => commands::journal::run_streaks(args, cfg),
        Commands::Buckets(args) => commands::journal::run_buckets(args, cfg),
        Commands::Confluence(args) => commands::journal::run_confluence(args, cfg),
        Commands::Mood(args) => commands::journal::run_mood(args, cfg),
        Commands::Breakdown(args) => commands::journal::run_breakdown(args, cfg),
        Commands::RiskOfRuin(args) => commands::risk::run_risk_of_ruin(args, cfg),
        Commands::Projection(args) => commands::risk::run_projection(args, cfg),
        Commands::Goal(args) => commands::goals::run_goal(args, cfg),
        Commands::Weekly(args) => commands::journal::run_weekly(args, cfg),
        Commands::List(args) => commands::journal::run_list(args, cfg),
        Commands::ExportCsv(args) => commands::export::run_export_csv(args, cfg),
        Commands::ImportCsv(args) => commands::export::run_import_csv(args),
        Commands::Version => {
            println!("tj {}", env!("CARGO_PKG_VERSION"));
            Ok(serde_json::Value::Null)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let format = cli.output.clone();

    match run(cli) {
        Ok(serde_json::Value::Null) => process::exit(0),
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
