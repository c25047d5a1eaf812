use std::time::Instant;

use clap::Args;
use rust_decimal::Decimal;

use trade_journal_core::analytics::goals::{evaluate_goal, MonthlyGoal};
use trade_journal_core::AnalyticsConfig;

use super::journal::{envelope, load_prepared, CmdResult, JournalArgs};

/// Arguments for monthly goal progress
#[derive(Args)]
pub struct GoalArgs {
    #[command(flatten)]
    pub journal: JournalArgs,
    /// Goal month (1-12)
    #[arg(long)]
    pub month: u32,
    /// Goal year
    #[arg(long)]
    pub year: i32,
    /// Target number of trades
    #[arg(long)]
    pub target_trades: Option<u32>,
    /// Target win rate in percent
    #[arg(long)]
    pub target_win_rate: Option<Decimal>,
    /// Target profit in currency
    #[arg(long)]
    pub target_profit: Option<Decimal>,
}

pub fn run_goal(args: GoalArgs, cfg: Option<&AnalyticsConfig>) -> CmdResult {
    let start = Instant::now();
    let p = load_prepared(&args.journal, cfg)?;
    let goal = MonthlyGoal {
        month: args.month,
        year: args.year,
        target_trades: args.target_trades,
        target_win_rate: args.target_win_rate,
        target_profit: args.target_profit,
    };
    let progress = evaluate_goal(&p.trades, &goal, &p.config)?;
    envelope("Monthly goal progress", &p, Vec::new(), start, progress)
}
