use std::time::Instant;

use clap::Args;
use rust_decimal::Decimal;

use trade_journal_core::analytics::projection::project_equity;
use trade_journal_core::analytics::risk_of_ruin::estimate_risk_of_ruin;
use trade_journal_core::AnalyticsConfig;

use super::journal::{envelope, load_prepared, CmdResult, JournalArgs};

/// Arguments for the risk-of-ruin table
#[derive(Args)]
pub struct RiskOfRuinArgs {
    #[command(flatten)]
    pub journal: JournalArgs,
    /// Risk-per-trade percentages, comma separated (e.g. 0.5,1,2)
    #[arg(long, value_delimiter = ',')]
    pub levels: Vec<Decimal>,
}

pub fn run_risk_of_ruin(args: RiskOfRuinArgs, cfg: Option<&AnalyticsConfig>) -> CmdResult {
    let start = Instant::now();
    let mut p = load_prepared(&args.journal, cfg)?;
    if !args.levels.is_empty() {
        p.config.risk_levels = args.levels;
    }
    let mut out = estimate_risk_of_ruin(&p.trades, &p.config.risk_levels)?;
    let warnings = std::mem::take(&mut out.warnings);
    envelope(
        "Gambler's-ruin approximation per risk level",
        &p,
        warnings,
        start,
        out,
    )
}

/// Arguments for the twelve-month equity projection
#[derive(Args)]
pub struct ProjectionArgs {
    #[command(flatten)]
    pub journal: JournalArgs,
}

pub fn run_projection(args: ProjectionArgs, cfg: Option<&AnalyticsConfig>) -> CmdResult {
    let start = Instant::now();
    let p = load_prepared(&args.journal, cfg)?;
    let mut out = project_equity(&p.trades, &p.config);
    let warnings = std::mem::take(&mut out.warnings);
    envelope(
        "Compounded expectancy projection (expected, optimistic, pessimistic)",
        &p,
        warnings,
        start,
        out,
    )
}
