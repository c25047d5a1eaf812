use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::ordering::chronological;
use crate::analytics::outcome::realized_return;
use crate::trade::{Outcome, TradeRecord};
use crate::types::{win_rate, Rate, ReturnUnits};

const RECENT_TRADES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRecap {
    /// Monday
    pub week_start: NaiveDate,
    /// Sunday
    pub week_end: NaiveDate,
    pub trades: u32,
    pub wins: u32,
    pub losses: u32,
    pub breakevens: u32,
    pub win_rate: Rate,
    pub total_return: ReturnUnits,
    /// Last trades of the week, most recent first
    pub recent: Vec<TradeRecord>,
}

/// Recap of the Monday-to-Sunday week containing `reference`.
pub fn weekly_recap(trades: &[TradeRecord], reference: NaiveDate) -> WeeklyRecap {
    let week_start =
        reference - Duration::days(i64::from(reference.weekday().num_days_from_monday()));
    let week_end = week_start + Duration::days(6);

    let week: Vec<&TradeRecord> = chronological(trades)
        .into_iter()
        .filter(|t| t.date >= week_start && t.date <= week_end)
        .collect();

    let mut wins = 0u32;
    let mut losses = 0u32;
    let mut breakevens = 0u32;
    let mut total_return = Decimal::ZERO;
    for trade in &week {
        if trade.outcome.is_win() {
            wins += 1;
        } else if trade.outcome.is_loss() {
            losses += 1;
        } else if trade.outcome == Outcome::Breakeven {
            breakevens += 1;
        }
        total_return += realized_return(trade);
    }
    let count = week.len() as u32;

    WeeklyRecap {
        week_start,
        week_end,
        trades: count,
        wins,
        losses,
        breakevens,
        win_rate: win_rate(wins, count),
        total_return,
        recent: week
            .iter()
            .rev()
            .take(RECENT_TRADES)
            .map(|t| (*t).clone())
            .collect(),
    }
}
