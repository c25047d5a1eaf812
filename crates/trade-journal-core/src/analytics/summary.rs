use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::outcome::{realized_return, WinLossTally};
use crate::config::AnalyticsConfig;
use crate::trade::{Outcome, TradeRecord};
use crate::types::{win_rate, Money, Rate, ReturnUnits};

/// Headline metrics for a set of trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_trades: u32,
    pub wins: u32,
    pub losses: u32,
    pub breakevens: u32,
    pub unfilled: u32,
    /// wins / total trades
    pub win_rate: Rate,
    pub total_return: ReturnUnits,
    pub total_pnl: Money,
    pub final_equity: Money,
    /// Gross win / gross loss; None without losing trades
    pub profit_factor: Option<Decimal>,
    pub average_win: ReturnUnits,
    pub average_loss: ReturnUnits,
    pub average_rr: Decimal,
    /// Expected return per trade in units
    pub expectancy: ReturnUnits,
}

pub fn performance_summary(trades: &[TradeRecord], config: &AnalyticsConfig) -> PerformanceSummary {
    let tally = WinLossTally::from_trades(trades);
    let total_trades = tally.total();
    let breakevens = trades
        .iter()
        .filter(|t| t.outcome == Outcome::Breakeven)
        .count() as u32;

    let total_return: ReturnUnits = trades.iter().map(realized_return).sum();
    let total_pnl = total_return * config.pnl_scale;

    let profit_factor = if tally.gross_loss > Decimal::ZERO {
        Some(tally.gross_win / tally.gross_loss)
    } else {
        None
    };

    let average_win = tally.average_win().unwrap_or(Decimal::ZERO);
    let average_loss = tally.average_loss().unwrap_or(Decimal::ZERO);

    let logged_rr: Vec<Decimal> = trades
        .iter()
        .filter_map(|t| t.rr)
        .filter(|rr| *rr > Decimal::ZERO)
        .collect();
    let average_rr = if !logged_rr.is_empty() {
        logged_rr.iter().copied().sum::<Decimal>() / Decimal::from(logged_rr.len())
    } else if average_loss > Decimal::ZERO {
        average_win / average_loss
    } else {
        average_win
    };

    let rate = win_rate(tally.wins, total_trades);
    let expectancy = rate * average_win - (Decimal::ONE - rate) * average_loss;

    PerformanceSummary {
        total_trades,
        wins: tally.wins,
        losses: tally.losses,
        breakevens,
        unfilled: tally.neutral - breakevens,
        win_rate: rate,
        total_return,
        total_pnl,
        final_equity: config.starting_capital + total_pnl,
        profit_factor,
        average_win,
        average_loss,
        average_rr,
        expectancy,
    }
}
