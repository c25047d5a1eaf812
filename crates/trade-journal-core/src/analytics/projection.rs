use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::analytics::outcome::WinLossTally;
use crate::config::AnalyticsConfig;
use crate::trade::TradeRecord;
use crate::types::{Money, Rate, ReturnUnits};

pub const PROJECTION_MONTHS: u32 = 12;
pub const MIN_DECIDED_TRADES: u32 = 3;
pub const PROJECTION_DISCLAIMER: &str =
    "Equity projection extrapolates past expectancy and is not a forecast";
pub const PROJECTION_CAPPED: &str =
    "Equity projection exceeded the representable range and was capped";

const OPTIMISTIC_FACTOR: Decimal = dec!(1.5);
const PESSIMISTIC_FACTOR: Decimal = dec!(0.5);
const PESSIMISTIC_FLOOR: Rate = dec!(-0.05);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub month: u32,
    /// `M0` .. `M12`
    pub label: String,
    pub expected: Money,
    pub optimistic: Money,
    pub pessimistic: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityProjection {
    pub expected_per_trade: ReturnUnits,
    pub trades_per_month: u32,
    /// Monthly growth of the expected path as a fraction
    pub monthly_growth: Rate,
    pub points: Vec<ProjectionPoint>,
    /// Growth of the expected path over the horizon, percent
    pub projected_growth_pct: Rate,
    pub warnings: Vec<String>,
}

fn whole(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// One month of compounding, floored at zero. Saturates at `Decimal::MAX`
/// and flags `capped` when the path leaves the representable range.
fn compound(balance: Money, growth: Rate, capped: &mut bool) -> Money {
    match (Decimal::ONE + growth).max(Decimal::ZERO).checked_mul(balance) {
        Some(next) => next,
        None => {
            *capped = true;
            Decimal::MAX
        }
    }
}

/// Twelve-month compounding projection of the journal's expectancy along
/// expected, optimistic and pessimistic paths.
pub fn project_equity(trades: &[TradeRecord], config: &AnalyticsConfig) -> EquityProjection {
    let tally = WinLossTally::from_trades(trades);
    let decided = tally.decided();
    let mut warnings = vec![PROJECTION_DISCLAIMER.to_string()];

    if decided < MIN_DECIDED_TRADES {
        tracing::warn!(decided, "too few decided trades for an equity projection");
        warnings.push(format!(
            "Insufficient history: projection needs at least {MIN_DECIDED_TRADES} winning or losing trades, found {decided}"
        ));
        return EquityProjection {
            expected_per_trade: Decimal::ZERO,
            trades_per_month: 0,
            monthly_growth: Decimal::ZERO,
            points: Vec::new(),
            projected_growth_pct: Decimal::ZERO,
            warnings,
        };
    }

    let p = Decimal::from(tally.wins) / Decimal::from(decided);
    let avg_win = tally.average_win().unwrap_or(Decimal::ZERO);
    let avg_loss = tally.average_loss().unwrap_or(Decimal::ZERO);
    let expected_per_trade = p * avg_win - (Decimal::ONE - p) * avg_loss;
    let trades_per_month = decided.div_ceil(3).max(1);

    let monthly_growth = expected_per_trade * Decimal::from(trades_per_month) / dec!(100);
    let optimistic_growth = monthly_growth * OPTIMISTIC_FACTOR;
    let pessimistic_growth = (monthly_growth * PESSIMISTIC_FACTOR).max(PESSIMISTIC_FLOOR);

    let start = config.starting_capital;
    let (mut expected, mut optimistic, mut pessimistic) = (start, start, start);
    let mut capped = false;
    let mut points = Vec::with_capacity(PROJECTION_MONTHS as usize + 1);
    for month in 0..=PROJECTION_MONTHS {
        if month > 0 {
            expected = compound(expected, monthly_growth, &mut capped);
            optimistic = compound(optimistic, optimistic_growth, &mut capped);
            pessimistic = compound(pessimistic, pessimistic_growth, &mut capped);
        }
        points.push(ProjectionPoint {
            month,
            label: format!("M{month}"),
            expected: whole(expected),
            optimistic: whole(optimistic),
            pessimistic: whole(pessimistic),
        });
    }

    if capped {
        tracing::warn!(monthly_growth = %monthly_growth, "equity projection capped");
        warnings.push(PROJECTION_CAPPED.to_string());
    }
    let projected_growth_pct = if start.is_zero() {
        Decimal::ZERO
    } else {
        (expected - start)
            .checked_div(start)
            .and_then(|g| g.checked_mul(dec!(100)))
            .unwrap_or(Decimal::MAX)
    };

    EquityProjection {
        expected_per_trade,
        trades_per_month,
        monthly_growth,
        points,
        projected_growth_pct,
        warnings,
    }
}
