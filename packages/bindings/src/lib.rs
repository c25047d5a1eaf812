use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use serde_json::json;

use trade_journal_core::analytics::confluence::ConfluenceSide;
use trade_journal_core::analytics::goals::MonthlyGoal;
use trade_journal_core::analytics::{self, filter::apply_filter, JournalInput};
use trade_journal_core::trade::validate_trades;
use trade_journal_core::{export, AnalyticsConfig, TradeRecord};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse a journal payload (`{"trades": [...], "config": {...}, "filter": {...}}`
/// or a bare trade array) into validated, filtered trades and its config.
fn load(input_json: &str) -> NapiResult<(Vec<TradeRecord>, AnalyticsConfig)> {
    let value: serde_json::Value = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let journal: JournalInput = if value.is_array() {
        JournalInput {
            trades: serde_json::from_value(value).map_err(to_napi_error)?,
            ..Default::default()
        }
    } else {
        serde_json::from_value(value).map_err(to_napi_error)?
    };
    journal.config.validate().map_err(to_napi_error)?;
    let mut trades = validate_trades(&journal.trades).map_err(to_napi_error)?;
    if let Some(filter) = &journal.filter {
        filter.validate().map_err(to_napi_error)?;
        trades = apply_filter(&trades, filter);
    }
    Ok((trades, journal.config))
}

fn to_json(value: &impl serde::Serialize) -> NapiResult<String> {
    serde_json::to_string(value).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Full report
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_journal(input_json: String) -> NapiResult<String> {
    let input: JournalInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analytics::analyze_journal(&input).map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn validate_journal(input_json: String) -> NapiResult<String> {
    let (trades, _) = load(&input_json)?;
    to_json(&trades)
}

// ---------------------------------------------------------------------------
// Equity and streaks
// ---------------------------------------------------------------------------

#[napi]
pub fn equity_curve(input_json: String) -> NapiResult<String> {
    let (trades, cfg) = load(&input_json)?;
    let curve = analytics::equity::equity_curve(&trades, cfg.starting_capital, cfg.pnl_scale);
    let drawdown = analytics::equity::max_drawdown(&trades, cfg.pnl_scale);
    to_json(&json!({ "equity_curve": curve, "drawdown": drawdown }))
}

#[napi]
pub fn detect_streaks(input_json: String) -> NapiResult<String> {
    let (trades, _) = load(&input_json)?;
    to_json(&analytics::streaks::detect_streaks(&trades))
}

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

#[napi]
pub fn performance_by_weekday(input_json: String) -> NapiResult<String> {
    let (trades, _) = load(&input_json)?;
    to_json(&analytics::temporal::performance_by_weekday(&trades))
}

#[napi]
pub fn performance_by_hour(input_json: String) -> NapiResult<String> {
    let (trades, cfg) = load(&input_json)?;
    to_json(&analytics::temporal::performance_by_hour(&trades, cfg.hour_range))
}

#[napi]
pub fn monthly_summary(input_json: String) -> NapiResult<String> {
    let (trades, cfg) = load(&input_json)?;
    to_json(&analytics::temporal::monthly_summary(&trades, &cfg))
}

/// `side` is `"pro"` or `"contra"`.
#[napi]
pub fn confluence_stats(input_json: String, side: String) -> NapiResult<String> {
    let (trades, _) = load(&input_json)?;
    let side = match side.to_ascii_lowercase().as_str() {
        "pro" => ConfluenceSide::Pro,
        "contra" | "contro" => ConfluenceSide::Contra,
        other => return Err(to_napi_error(format!("Unknown confluence side '{other}'"))),
    };
    to_json(&analytics::confluence::confluence_stats(&trades, side))
}

#[napi]
pub fn mood_stats(input_json: String) -> NapiResult<String> {
    let (trades, _) = load(&input_json)?;
    to_json(&analytics::confluence::mood_stats(&trades))
}

#[napi]
pub fn performance_breakdown(input_json: String) -> NapiResult<String> {
    let (trades, cfg) = load(&input_json)?;
    to_json(&json!({
        "summary": analytics::summary::performance_summary(&trades, &cfg),
        "outcome_breakdown": analytics::breakdown::outcome_breakdown(&trades),
        "pair_performance": analytics::breakdown::pair_performance(&trades, &cfg),
        "r_distribution": analytics::breakdown::r_multiple_distribution(&trades),
    }))
}

// ---------------------------------------------------------------------------
// Estimators and goals
// ---------------------------------------------------------------------------

#[napi]
pub fn risk_of_ruin(input_json: String) -> NapiResult<String> {
    let (trades, cfg) = load(&input_json)?;
    let output = analytics::risk_of_ruin::estimate_risk_of_ruin(&trades, &cfg.risk_levels)
        .map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn project_equity(input_json: String) -> NapiResult<String> {
    let (trades, cfg) = load(&input_json)?;
    to_json(&analytics::projection::project_equity(&trades, &cfg))
}

#[napi]
pub fn goal_progress(input_json: String, goal_json: String) -> NapiResult<String> {
    let (trades, cfg) = load(&input_json)?;
    let goal: MonthlyGoal = serde_json::from_str(&goal_json).map_err(to_napi_error)?;
    let progress = analytics::goals::evaluate_goal(&trades, &goal, &cfg).map_err(to_napi_error)?;
    to_json(&progress)
}

/// `week_of` is a `YYYY-MM-DD` date inside the week.
#[napi]
pub fn weekly_recap(input_json: String, week_of: String) -> NapiResult<String> {
    let (trades, _) = load(&input_json)?;
    let reference = NaiveDate::parse_from_str(week_of.trim(), "%Y-%m-%d").map_err(to_napi_error)?;
    to_json(&analytics::weekly::weekly_recap(&trades, reference))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[napi]
pub fn export_csv(input_json: String) -> NapiResult<String> {
    let (trades, cfg) = load(&input_json)?;
    export::to_csv_string(&trades, cfg.pnl_scale).map_err(to_napi_error)
}

#[napi]
pub fn parse_csv(csv_text: String) -> NapiResult<String> {
    let rows = export::parse_csv(csv_text.as_bytes()).map_err(to_napi_error)?;
    to_json(&rows)
}
