use std::time::Instant;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};

use trade_journal_core::analytics::breakdown::{
    outcome_breakdown, pair_performance, r_multiple_distribution,
};
use trade_journal_core::analytics::confluence::{confluence_stats, mood_stats, ConfluenceSide};
use trade_journal_core::analytics::equity::{equity_curve, max_drawdown};
use trade_journal_core::analytics::filter::{apply_filter, TradeFilter};
use trade_journal_core::analytics::ordering::chronological;
use trade_journal_core::analytics::streaks::detect_streaks;
use trade_journal_core::analytics::temporal::{
    monthly_summary, performance_by_hour, performance_by_weekday,
};
use trade_journal_core::analytics::weekly::weekly_recap;
use trade_journal_core::analytics::{analyze_journal, JournalInput};
use trade_journal_core::trade::validate_trades_with_warnings;
use trade_journal_core::{with_metadata, AnalyticsConfig, Direction, Outcome, TradeRecord};

use crate::input;

pub type CmdResult = Result<Value, Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Shared journal loading
// ---------------------------------------------------------------------------

/// Journal source, config overrides and subset filter shared by every command.
#[derive(Args)]
pub struct JournalArgs {
    /// Path to a JSON trade list: an array of trades or {"trades": [...], "config": {...}}
    #[arg(long)]
    pub input: Option<String>,
    /// Starting capital (overrides any config)
    #[arg(long)]
    pub starting_capital: Option<Decimal>,
    /// Currency P&L per return unit (overrides any config)
    #[arg(long)]
    pub pnl_scale: Option<Decimal>,
    /// Only trades on this pair (case-insensitive)
    #[arg(long)]
    pub pair: Option<String>,
    /// Only long or short trades
    #[arg(long)]
    pub direction: Option<Direction>,
    /// Only trades with this outcome
    #[arg(long)]
    pub outcome: Option<Outcome>,
    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl JournalArgs {
    fn filter(&self) -> Option<TradeFilter> {
        let filter = TradeFilter {
            pair: self.pair.clone(),
            direction: self.direction,
            outcome: self.outcome,
            from: self.from,
            to: self.to,
        };
        (!filter.is_empty()).then_some(filter)
    }
}

/// Read the journal from `--input` or stdin, then layer the `--config` file
/// and flag overrides on top of any config embedded in the input.
pub fn load_journal(
    args: &JournalArgs,
    file_config: Option<&AnalyticsConfig>,
) -> Result<JournalInput, Box<dyn std::error::Error>> {
    let value = if let Some(ref path) = args.input {
        input::file::read_json_value(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <trades.json> or stdin required".into());
    };

    let mut journal: JournalInput = if value.is_array() {
        JournalInput {
            trades: serde_json::from_value(value)?,
            ..Default::default()
        }
    } else {
        serde_json::from_value(value)?
    };

    if let Some(cfg) = file_config {
        journal.config = cfg.clone();
    }
    if let Some(capital) = args.starting_capital {
        journal.config.starting_capital = capital;
    }
    if let Some(scale) = args.pnl_scale {
        journal.config.pnl_scale = scale;
    }
    if let Some(filter) = args.filter() {
        journal.filter = Some(filter);
    }
    tracing::info!(trades = journal.trades.len(), "loaded journal");
    Ok(journal)
}

/// Validated, filtered trades with the effective config.
pub struct Prepared {
    pub trades: Vec<TradeRecord>,
    pub config: AnalyticsConfig,
    /// Validation notices carried into every command's envelope
    pub warnings: Vec<String>,
}

pub fn prepare(journal: &JournalInput) -> Result<Prepared, Box<dyn std::error::Error>> {
    journal.config.validate()?;
    let (mut trades, warnings) = validate_trades_with_warnings(&journal.trades)?;
    if let Some(filter) = &journal.filter {
        filter.validate()?;
        trades = apply_filter(&trades, filter);
        tracing::debug!(remaining = trades.len(), "filter applied");
    }
    Ok(Prepared {
        trades,
        config: journal.config.clone(),
        warnings,
    })
}

pub fn load_prepared(
    args: &JournalArgs,
    file_config: Option<&AnalyticsConfig>,
) -> Result<Prepared, Box<dyn std::error::Error>> {
    prepare(&load_journal(args, file_config)?)
}

/// Wrap a single analytic in the standard output envelope.
pub fn envelope<T: Serialize>(
    methodology: &str,
    prepared: &Prepared,
    warnings: Vec<String>,
    start: Instant,
    result: T,
) -> CmdResult {
    let mut all_warnings = prepared.warnings.clone();
    all_warnings.extend(warnings);
    let out = with_metadata(
        methodology,
        &prepared.config,
        all_warnings,
        start.elapsed().as_micros() as u64,
        prepared.trades.len(),
        result,
    );
    Ok(serde_json::to_value(out)?)
}

// ---------------------------------------------------------------------------
// Full report
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub journal: JournalArgs,
    /// Reference date for the weekly recap (defaults to the latest trade)
    #[arg(long)]
    pub week_of: Option<NaiveDate>,
}

pub fn run_analyze(args: AnalyzeArgs, cfg: Option<&AnalyticsConfig>) -> CmdResult {
    let mut journal = load_journal(&args.journal, cfg)?;
    if args.week_of.is_some() {
        journal.week_of = args.week_of;
    }
    let result = analyze_journal(&journal)?;
    Ok(serde_json::to_value(result)?)
}

// ---------------------------------------------------------------------------
// Equity, drawdown, streaks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct EquityArgs {
    #[command(flatten)]
    pub journal: JournalArgs,
}

pub fn run_equity(args: EquityArgs, cfg: Option<&AnalyticsConfig>) -> CmdResult {
    let start = Instant::now();
    let p = load_prepared(&args.journal, cfg)?;
    let curve = equity_curve(&p.trades, p.config.starting_capital, p.config.pnl_scale);
    let drawdown = max_drawdown(&p.trades, p.config.pnl_scale);
    let final_equity = curve
        .last()
        .map(|pt| pt.equity)
        .unwrap_or(p.config.starting_capital);
    envelope(
        "Equity curve from outcome-normalized P&L with peak-to-trough drawdown",
        &p,
        Vec::new(),
        start,
        json!({
            "final_equity": final_equity,
            "max_drawdown": drawdown.max_drawdown,
            "max_drawdown_pct": drawdown.max_drawdown_pct,
            "equity_curve": curve,
        }),
    )
}

#[derive(Args)]
pub struct StreaksArgs {
    #[command(flatten)]
    pub journal: JournalArgs,
}

pub fn run_streaks(args: StreaksArgs, cfg: Option<&AnalyticsConfig>) -> CmdResult {
    let start = Instant::now();
    let p = load_prepared(&args.journal, cfg)?;
    let streaks = detect_streaks(&p.trades);
    envelope("Consecutive win/loss streaks", &p, Vec::new(), start, streaks)
}

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, ValueEnum)]
pub enum BucketBy {
    Weekday,
    Hour,
    Month,
}

#[derive(Args)]
pub struct BucketsArgs {
    #[command(flatten)]
    pub journal: JournalArgs,
    /// Aggregation key
    #[arg(long, default_value = "weekday")]
    pub by: BucketBy,
}

pub fn run_buckets(args: BucketsArgs, cfg: Option<&AnalyticsConfig>) -> CmdResult {
    let start = Instant::now();
    let p = load_prepared(&args.journal, cfg)?;
    match args.by {
        BucketBy::Weekday => envelope(
            "Win rate by day of week",
            &p,
            Vec::new(),
            start,
            performance_by_weekday(&p.trades),
        ),
        BucketBy::Hour => {
            let untimed = p.trades.iter().filter(|t| t.time.is_none()).count();
            let warnings = if untimed > 0 {
                vec![format!("{untimed} trades without a time were left out")]
            } else {
                Vec::new()
            };
            envelope(
                "Win rate by hour of day",
                &p,
                warnings,
                start,
                performance_by_hour(&p.trades, p.config.hour_range),
            )
        }
        BucketBy::Month => envelope(
            "Monthly P&L with equity carried forward",
            &p,
            Vec::new(),
            start,
            monthly_summary(&p.trades, &p.config),
        ),
    }
}

// ---------------------------------------------------------------------------
// Confluences and moods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, ValueEnum)]
pub enum SideArg {
    Pro,
    Contra,
}

#[derive(Args)]
pub struct ConfluenceArgs {
    #[command(flatten)]
    pub journal: JournalArgs,
    /// Which confluence list to aggregate
    #[arg(long, default_value = "pro")]
    pub side: SideArg,
}

pub fn run_confluence(args: ConfluenceArgs, cfg: Option<&AnalyticsConfig>) -> CmdResult {
    let start = Instant::now();
    let p = load_prepared(&args.journal, cfg)?;
    let side = match args.side {
        SideArg::Pro => ConfluenceSide::Pro,
        SideArg::Contra => ConfluenceSide::Contra,
    };
    envelope(
        "Per-tag outcome counts and win rate",
        &p,
        Vec::new(),
        start,
        confluence_stats(&p.trades, side),
    )
}

#[derive(Args)]
pub struct MoodArgs {
    #[command(flatten)]
    pub journal: JournalArgs,
}

pub fn run_mood(args: MoodArgs, cfg: Option<&AnalyticsConfig>) -> CmdResult {
    let start = Instant::now();
    let p = load_prepared(&args.journal, cfg)?;
    envelope(
        "Per-emotion outcome counts, win rate and share",
        &p,
        Vec::new(),
        start,
        mood_stats(&p.trades),
    )
}

// ---------------------------------------------------------------------------
// Breakdowns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, ValueEnum)]
pub enum BreakdownBy {
    Outcome,
    Pair,
    RMultiple,
}

#[derive(Args)]
pub struct BreakdownArgs {
    #[command(flatten)]
    pub journal: JournalArgs,
    #[arg(long, default_value = "outcome")]
    pub by: BreakdownBy,
}

pub fn run_breakdown(args: BreakdownArgs, cfg: Option<&AnalyticsConfig>) -> CmdResult {
    let start = Instant::now();
    let p = load_prepared(&args.journal, cfg)?;
    match args.by {
        BreakdownBy::Outcome => envelope(
            "Long/short split per outcome",
            &p,
            Vec::new(),
            start,
            outcome_breakdown(&p.trades),
        ),
        BreakdownBy::Pair => envelope(
            "Per-pair results ordered by P&L",
            &p,
            Vec::new(),
            start,
            pair_performance(&p.trades, &p.config),
        ),
        BreakdownBy::RMultiple => envelope(
            "Realized R-multiple distribution",
            &p,
            Vec::new(),
            start,
            r_multiple_distribution(&p.trades),
        ),
    }
}

// ---------------------------------------------------------------------------
// Weekly recap and listing
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct WeeklyArgs {
    #[command(flatten)]
    pub journal: JournalArgs,
    /// Any date inside the week (defaults to the latest trade)
    #[arg(long)]
    pub week_of: Option<NaiveDate>,
}

pub fn run_weekly(args: WeeklyArgs, cfg: Option<&AnalyticsConfig>) -> CmdResult {
    let start = Instant::now();
    let p = load_prepared(&args.journal, cfg)?;
    let reference = args
        .week_of
        .or_else(|| p.trades.iter().map(|t| t.date).max())
        .ok_or("--week-of is required for an empty journal")?;
    envelope(
        "Monday-to-Sunday weekly recap",
        &p,
        Vec::new(),
        start,
        weekly_recap(&p.trades, reference),
    )
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub journal: JournalArgs,
}

/// Validated, filtered trades in chronological order.
pub fn run_list(args: ListArgs, cfg: Option<&AnalyticsConfig>) -> CmdResult {
    let start = Instant::now();
    let p = load_prepared(&args.journal, cfg)?;
    let ordered: Vec<&TradeRecord> = chronological(&p.trades);
    envelope("Validated trades in time order", &p, Vec::new(), start, ordered)
}
