use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::analytics::outcome::realized_pnl;
use crate::config::AnalyticsConfig;
use crate::trade::TradeRecord;
use crate::types::{win_rate, Money, Rate};
use crate::{JournalError, JournalResult};

/// Targets set for one calendar month. Absent targets report zero progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyGoal {
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub target_trades: Option<u32>,
    /// Percent, e.g. 60 for 60%
    #[serde(default)]
    pub target_win_rate: Option<Rate>,
    #[serde(default)]
    pub target_profit: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub month: u32,
    pub year: i32,
    pub actual_trades: u32,
    pub actual_win_rate_pct: Rate,
    pub actual_profit: Money,
    pub trades_progress_pct: Rate,
    pub win_rate_progress_pct: Rate,
    pub profit_progress_pct: Rate,
}

/// `actual / target` as a percentage in [0, 100]; zero without a positive target.
pub fn progress_pct(actual: Decimal, target: Option<Decimal>) -> Rate {
    match target {
        Some(t) if t > Decimal::ZERO => actual
            .checked_div(t)
            .and_then(|r| r.checked_mul(dec!(100)))
            .unwrap_or(if actual > Decimal::ZERO { dec!(100) } else { Decimal::ZERO })
            .clamp(Decimal::ZERO, dec!(100)),
        _ => Decimal::ZERO,
    }
}

pub fn evaluate_goal(
    trades: &[TradeRecord],
    goal: &MonthlyGoal,
    config: &AnalyticsConfig,
) -> JournalResult<GoalProgress> {
    if !(1..=12).contains(&goal.month) {
        return Err(JournalError::DateError(format!(
            "Goal month {} is outside 1..=12",
            goal.month
        )));
    }

    let mut actual_trades: u32 = 0;
    let mut wins: u32 = 0;
    let mut actual_profit = Decimal::ZERO;
    for trade in trades
        .iter()
        .filter(|t| t.date.year() == goal.year && t.date.month() == goal.month)
    {
        actual_trades += 1;
        if trade.outcome.is_win() {
            wins += 1;
        }
        actual_profit += realized_pnl(trade, config.pnl_scale);
    }
    let actual_win_rate_pct = win_rate(wins, actual_trades) * dec!(100);

    Ok(GoalProgress {
        month: goal.month,
        year: goal.year,
        actual_trades,
        actual_win_rate_pct,
        actual_profit,
        trades_progress_pct: progress_pct(
            Decimal::from(actual_trades),
            goal.target_trades.map(Decimal::from),
        ),
        win_rate_progress_pct: progress_pct(actual_win_rate_pct, goal.target_win_rate),
        profit_progress_pct: progress_pct(actual_profit, goal.target_profit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::dated;
    use crate::trade::Outcome;

    fn goal() -> MonthlyGoal {
        MonthlyGoal {
            month: 3,
            year: 2025,
            target_trades: Some(10),
            target_win_rate: Some(dec!(50)),
            target_profit: Some(dec!(1000)),
        }
    }

    #[test]
    fn test_progress_pct() {
        assert_eq!(progress_pct(dec!(5), Some(dec!(10))), dec!(50));
        assert_eq!(progress_pct(dec!(15), Some(dec!(10))), dec!(100));
        assert_eq!(progress_pct(dec!(-5), Some(dec!(10))), Decimal::ZERO);
        assert_eq!(progress_pct(dec!(5), Some(Decimal::ZERO)), Decimal::ZERO);
        assert_eq!(progress_pct(dec!(5), None), Decimal::ZERO);
        let tiny = Some(dec!(0.0000000000000001));
        assert_eq!(progress_pct(dec!(1000000000000), tiny), dec!(100));
        assert_eq!(progress_pct(dec!(-1000000000000), tiny), Decimal::ZERO);
    }

    #[test]
    fn test_evaluate_goal_counts_month_only() {
        let trades = vec![
            dated((2025, 3, 3), None, Outcome::Target, dec!(2), dec!(1)),
            dated((2025, 3, 4), None, Outcome::Partial, dec!(2), dec!(1)),
            dated((2025, 3, 5), None, Outcome::StopLoss, dec!(2), dec!(1)),
            dated((2025, 3, 6), None, Outcome::Breakeven, dec!(2), dec!(1)),
            dated((2025, 4, 1), None, Outcome::Target, dec!(2), dec!(1)),
            dated((2024, 3, 1), None, Outcome::Target, dec!(2), dec!(1)),
        ];
        let p = evaluate_goal(&trades, &goal(), &AnalyticsConfig::default()).unwrap();
        assert_eq!(p.actual_trades, 4);
        assert_eq!(p.actual_win_rate_pct, dec!(50));
        // 200 + 100 - 100 + 0
        assert_eq!(p.actual_profit, dec!(200));
        assert_eq!(p.trades_progress_pct, dec!(40));
        assert_eq!(p.win_rate_progress_pct, dec!(100));
        assert_eq!(p.profit_progress_pct, dec!(20));
    }

    #[test]
    fn test_missing_targets_report_zero() {
        let g = MonthlyGoal {
            target_trades: None,
            target_win_rate: None,
            target_profit: None,
            ..goal()
        };
        let trades = vec![dated((2025, 3, 3), None, Outcome::Target, dec!(2), dec!(1))];
        let p = evaluate_goal(&trades, &g, &AnalyticsConfig::default()).unwrap();
        assert_eq!(p.actual_trades, 1);
        assert_eq!(p.trades_progress_pct, Decimal::ZERO);
        assert_eq!(p.win_rate_progress_pct, Decimal::ZERO);
        assert_eq!(p.profit_progress_pct, Decimal::ZERO);
    }

    #[test]
    fn test_losing_month_floors_profit_progress() {
        let trades = vec![dated((2025, 3, 3), None, Outcome::StopLoss, dec!(2), dec!(1))];
        let p = evaluate_goal(&trades, &goal(), &AnalyticsConfig::default()).unwrap();
        assert_eq!(p.actual_profit, dec!(-100));
        assert_eq!(p.profit_progress_pct, Decimal::ZERO);
    }

    #[test]
    fn test_invalid_month() {
        let g = MonthlyGoal { month: 13, ..goal() };
        let err = evaluate_goal(&[], &g, &AnalyticsConfig::default()).unwrap_err();
        assert!(matches!(err, JournalError::DateError(_)));
    }
}
