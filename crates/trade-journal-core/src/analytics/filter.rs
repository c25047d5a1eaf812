use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::trade::{Direction, Outcome, TradeRecord};
use crate::{JournalError, JournalResult};

/// Subset selector for the journal. Every set field must match; an empty
/// filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeFilter {
    /// Case-insensitive instrument match
    pub pair: Option<String>,
    pub direction: Option<Direction>,
    pub outcome: Option<Outcome>,
    /// Inclusive lower date bound
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub to: Option<NaiveDate>,
}

impl TradeFilter {
    pub fn is_empty(&self) -> bool {
        self == &TradeFilter::default()
    }

    pub fn validate(&self) -> JournalResult<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(JournalError::invalid(
                    "filter.from",
                    format!("Start date {from} is after end date {to}"),
                ));
            }
        }
        Ok(())
    }

    pub fn matches(&self, trade: &TradeRecord) -> bool {
        if let Some(pair) = &self.pair {
            if !trade.pair.eq_ignore_ascii_case(pair.trim()) {
                return false;
            }
        }
        if self.direction.is_some_and(|d| d != trade.direction) {
            return false;
        }
        if self.outcome.is_some_and(|o| o != trade.outcome) {
            return false;
        }
        if self.from.is_some_and(|from| trade.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| trade.date > to) {
            return false;
        }
        true
    }
}

/// Matching trades, in input order.
pub fn apply_filter(trades: &[TradeRecord], filter: &TradeFilter) -> Vec<TradeRecord> {
    trades.iter().filter(|t| filter.matches(t)).cloned().collect()
}
