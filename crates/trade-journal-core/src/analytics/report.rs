use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::breakdown::{
    outcome_breakdown, pair_performance, r_multiple_distribution, OutcomeDirectionSplit, PairStats,
    RBucket,
};
use crate::analytics::confluence::{
    confluence_stats, mood_stats, ConfluenceSide, MoodStats, TagStats,
};
use crate::analytics::equity::{equity_curve, max_drawdown, DrawdownSummary, EquityPoint};
use crate::analytics::filter::{apply_filter, TradeFilter};
use crate::analytics::goals::{evaluate_goal, GoalProgress, MonthlyGoal};
use crate::analytics::projection::{project_equity, EquityProjection};
use crate::analytics::risk_of_ruin::{estimate_risk_of_ruin, RiskOfRuinOutput};
use crate::analytics::streaks::{detect_streaks, StreakSummary};
use crate::analytics::summary::{performance_summary, PerformanceSummary};
use crate::analytics::temporal::{
    monthly_summary, performance_by_hour, performance_by_weekday, BucketStats, HourBucket,
    MonthlySummary,
};
use crate::analytics::weekly::{weekly_recap, WeeklyRecap};
use crate::config::AnalyticsConfig;
use crate::trade::{validate_trades_with_warnings, TradeInput};
use crate::types::{with_metadata, ComputationOutput};
use crate::JournalResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalInput {
    pub trades: Vec<TradeInput>,
    #[serde(default)]
    pub config: AnalyticsConfig,
    #[serde(default)]
    pub filter: Option<TradeFilter>,
    #[serde(default)]
    pub goal: Option<MonthlyGoal>,
    /// Reference date for the weekly recap; defaults to the latest trade date
    #[serde(default)]
    pub week_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalReport {
    pub summary: PerformanceSummary,
    pub equity_curve: Vec<EquityPoint>,
    pub drawdown: DrawdownSummary,
    pub streaks: StreakSummary,
    pub by_weekday: Vec<BucketStats>,
    pub by_hour: Vec<HourBucket>,
    pub monthly: MonthlySummary,
    pub confluences_pro: Vec<TagStats>,
    pub confluences_contra: Vec<TagStats>,
    pub moods: Vec<MoodStats>,
    pub risk_of_ruin: RiskOfRuinOutput,
    pub projection: EquityProjection,
    pub outcome_breakdown: Vec<OutcomeDirectionSplit>,
    pub pair_performance: Vec<PairStats>,
    pub r_distribution: Vec<RBucket>,
    pub goal: Option<GoalProgress>,
    pub weekly: Option<WeeklyRecap>,
}

// ---------------------------------------------------------------------------
// Main function
// ---------------------------------------------------------------------------

/// Validate the raw journal and derive every analytic from it.
pub fn analyze_journal(input: &JournalInput) -> JournalResult<ComputationOutput<JournalReport>> {
    let start = Instant::now();
    let config = &input.config;

    // -- Validation --
    config.validate()?;
    let (mut trades, mut warnings) = validate_trades_with_warnings(&input.trades)?;
    if let Some(filter) = input.filter.as_ref().filter(|f| !f.is_empty()) {
        filter.validate()?;
        let before = trades.len();
        trades = apply_filter(&trades, filter);
        tracing::debug!(before, after = trades.len(), "applied trade filter");
        if trades.is_empty() && before > 0 {
            warnings.push("Filter matched no trades".to_string());
        }
    }

    // -- Estimators --
    let risk_of_ruin = estimate_risk_of_ruin(&trades, &config.risk_levels)?;
    let projection = project_equity(&trades, config);
    warnings.extend(risk_of_ruin.warnings.iter().cloned());
    warnings.extend(projection.warnings.iter().cloned());

    let goal = input
        .goal
        .as_ref()
        .map(|g| evaluate_goal(&trades, g, config))
        .transpose()?;
    let weekly = input
        .week_of
        .or_else(|| trades.iter().map(|t| t.date).max())
        .map(|reference| weekly_recap(&trades, reference));

    let report = JournalReport {
        summary: performance_summary(&trades, config),
        equity_curve: equity_curve(&trades, config.starting_capital, config.pnl_scale),
        drawdown: max_drawdown(&trades, config.pnl_scale),
        streaks: detect_streaks(&trades),
        by_weekday: performance_by_weekday(&trades),
        by_hour: performance_by_hour(&trades, config.hour_range),
        monthly: monthly_summary(&trades, config),
        confluences_pro: confluence_stats(&trades, ConfluenceSide::Pro),
        confluences_contra: confluence_stats(&trades, ConfluenceSide::Contra),
        moods: mood_stats(&trades),
        risk_of_ruin,
        projection,
        outcome_breakdown: outcome_breakdown(&trades),
        pair_performance: pair_performance(&trades, config),
        r_distribution: r_multiple_distribution(&trades),
        goal,
        weekly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    tracing::debug!(trades = trades.len(), elapsed_us = elapsed, "journal analyzed");
    Ok(with_metadata(
        "Trade journal analytics: outcome-normalized returns, equity curve, drawdown, streaks, gambler's-ruin estimate",
        &serde_json::json!({
            "starting_capital": config.starting_capital.to_string(),
            "pnl_scale": config.pnl_scale.to_string(),
            "partial_fraction": "0.5",
            "risk_levels": config.risk_levels.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
            "hour_range": [config.hour_range.start, config.hour_range.end],
            "filtered": input.filter.as_ref().is_some_and(|f| !f.is_empty()),
        }),
        warnings,
        elapsed,
        trades.len(),
        report,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
