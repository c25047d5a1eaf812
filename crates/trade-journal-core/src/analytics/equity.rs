use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::analytics::ordering::chronological;
use crate::analytics::outcome::realized_pnl;
use crate::trade::TradeRecord;
use crate::types::{Money, Rate};

pub const START_LABEL: &str = "Start";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub label: String,
    /// None for the synthetic starting point
    pub date: Option<NaiveDate>,
    pub equity: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawdownSummary {
    /// Largest peak-to-trough decline of cumulative P&L (currency)
    pub max_drawdown: Money,
    /// Percentage in [0, 100] of max(peak, |total P&L|)
    pub max_drawdown_pct: Rate,
}

// ---------------------------------------------------------------------------
// Equity curve
// ---------------------------------------------------------------------------

/// Running equity over the chronologically ordered trades, preceded by a
/// synthetic start point at the starting capital.
pub fn equity_curve(
    trades: &[TradeRecord],
    starting_capital: Money,
    pnl_scale: Decimal,
) -> Vec<EquityPoint> {
    let ordered = chronological(trades);
    let mut curve = Vec::with_capacity(ordered.len() + 1);
    curve.push(EquityPoint {
        label: START_LABEL.to_string(),
        date: None,
        equity: starting_capital,
    });

    let mut equity = starting_capital;
    for trade in ordered {
        equity += realized_pnl(trade, pnl_scale);
        curve.push(EquityPoint {
            label: trade.date.format("%Y-%m-%d").to_string(),
            date: Some(trade.date),
            equity,
        });
    }
    curve
}

// ---------------------------------------------------------------------------
// Drawdown
// ---------------------------------------------------------------------------

/// Maximum drawdown of the zero-based cumulative P&L.
pub fn max_drawdown(trades: &[TradeRecord], pnl_scale: Decimal) -> DrawdownSummary {
    let pnls: Vec<Money> = chronological(trades)
        .into_iter()
        .map(|t| realized_pnl(t, pnl_scale))
        .collect();
    drawdown_of(&pnls)
}

fn drawdown_of(pnls: &[Money]) -> DrawdownSummary {
    if pnls.is_empty() {
        return DrawdownSummary::default();
    }
    let mut cumulative = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut max_dd = Decimal::ZERO;

    for &pnl in pnls {
        cumulative += pnl;
        if cumulative > peak {
            peak = cumulative;
        }
        let drawdown = peak - cumulative;
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }

    // cumulative now holds total P&L
    let denominator = peak.max(cumulative.abs());
    let max_drawdown_pct = if denominator > Decimal::ZERO {
        (max_dd / denominator * dec!(100)).min(dec!(100))
    } else {
        Decimal::ZERO
    };

    DrawdownSummary {
        max_drawdown: max_dd,
        max_drawdown_pct,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
