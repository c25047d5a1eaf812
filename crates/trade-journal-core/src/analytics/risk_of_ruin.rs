//! Risk-of-ruin table from the journal's win probability and payoff ratio.
//!
//! Uses the classical gambler's-ruin approximation: with `p` the win
//! probability, `R` the payoff ratio and `u = floor(100 / r)` the number of
//! full losses a risk of `r`% per trade can absorb,
//!
//! ```text
//! edge = p * R - (1 - p)
//! ruin = ((1 - p) / p)^u          when R == 1
//! ruin = ((1 - p) / (p * R))^u    otherwise
//! ```
//!
//! expressed as a percentage and capped at 100.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::analytics::outcome::WinLossTally;
use crate::config::validate_risk_levels;
use crate::trade::TradeRecord;
use crate::types::{Rate, ReturnUnits};
use crate::JournalResult;

pub const RUIN_DISCLAIMER: &str =
    "Risk of ruin is a gambler's-ruin approximation from past results, not a guarantee";
pub const INSUFFICIENT_HISTORY: &str =
    "Insufficient history: no winning or losing trades, risk of ruin reported as 100%";

const DEFAULT_WIN_PROBABILITY: Decimal = dec!(0.5);
const FALLBACK_AVG_WIN: Decimal = dec!(2);
const FALLBACK_AVG_LOSS: Decimal = dec!(1);
const FALLBACK_PAYOFF: Decimal = dec!(2);
const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuinLevel {
    /// Risk per trade, percent of capital
    pub risk_pct: Decimal,
    /// Consecutive full losses the account can absorb
    pub units_to_ruin: u32,
    pub risk_of_ruin_pct: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskOfRuinOutput {
    pub win_probability: Rate,
    pub average_win: ReturnUnits,
    pub average_loss: ReturnUnits,
    pub payoff_ratio: Decimal,
    pub edge: Decimal,
    pub levels: Vec<RuinLevel>,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Estimator
// ---------------------------------------------------------------------------

pub fn estimate_risk_of_ruin(
    trades: &[TradeRecord],
    risk_levels: &[Decimal],
) -> JournalResult<RiskOfRuinOutput> {
    validate_risk_levels(risk_levels)?;

    let tally = WinLossTally::from_trades(trades);
    let decided = tally.decided();
    let mut warnings = vec![RUIN_DISCLAIMER.to_string()];

    let win_probability = if decided > 0 {
        Decimal::from(tally.wins) / Decimal::from(decided)
    } else {
        DEFAULT_WIN_PROBABILITY
    };
    let average_win = tally.average_win().unwrap_or(FALLBACK_AVG_WIN);
    let average_loss = tally.average_loss().unwrap_or(FALLBACK_AVG_LOSS);
    let payoff_ratio = if average_loss.is_zero() {
        FALLBACK_PAYOFF
    } else {
        average_win / average_loss
    };
    let edge = win_probability * payoff_ratio - (Decimal::ONE - win_probability);

    if decided == 0 {
        tracing::warn!("risk of ruin requested without any decided trades");
        warnings.push(INSUFFICIENT_HISTORY.to_string());
    }

    let levels = risk_levels
        .iter()
        .map(|&risk_pct| {
            let units_to_ruin = units_for(risk_pct);
            let risk_of_ruin_pct = if decided == 0 {
                HUNDRED
            } else {
                ruin_pct(win_probability, payoff_ratio, edge, units_to_ruin)
            };
            RuinLevel {
                risk_pct,
                units_to_ruin,
                risk_of_ruin_pct,
            }
        })
        .collect();

    Ok(RiskOfRuinOutput {
        win_probability,
        average_win,
        average_loss,
        payoff_ratio,
        edge,
        levels,
        warnings,
    })
}

fn units_for(risk_pct: Decimal) -> u32 {
    (HUNDRED / risk_pct).floor().to_u32().unwrap_or(u32::MAX)
}

fn ruin_pct(p: Rate, payoff: Decimal, edge: Decimal, units: u32) -> Rate {
    // edge > 0 implies p > 0 and payoff > 0, so both divisions below are safe
    if edge <= Decimal::ZERO {
        return HUNDRED;
    }
    let base = if payoff == Decimal::ONE {
        (Decimal::ONE - p) / p
    } else {
        (Decimal::ONE - p) / (p * payoff)
    };
    if base >= Decimal::ONE {
        return HUNDRED;
    }
    (pow_decimal(base, units) * HUNDRED).min(HUNDRED)
}

/// Integer power by squaring; `base` is in [0, 1) here so the result only shrinks.
fn pow_decimal(base: Decimal, exp: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let mut b = base;
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result *= b;
        }
        b *= b;
        e >>= 1;
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
