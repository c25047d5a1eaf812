use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Money;
use crate::{JournalError, JournalResult};

/// Inclusive hour-of-day window used by the hourly aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl Default for HourRange {
    fn default() -> Self {
        HourRange { start: 6, end: 22 }
    }
}

/// Explicit analytics context passed into every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub starting_capital: Money,
    /// Currency notional per return unit; applied to every currency figure.
    pub pnl_scale: Decimal,
    /// Candidate risk-per-trade percentages for the risk-of-ruin table.
    pub risk_levels: Vec<Decimal>,
    pub hour_range: HourRange,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            starting_capital: dec!(10000),
            pnl_scale: dec!(100),
            risk_levels: default_risk_levels(),
            hour_range: HourRange::default(),
        }
    }
}

pub fn default_risk_levels() -> Vec<Decimal> {
    vec![dec!(0.5), dec!(1), dec!(2), dec!(3), dec!(5)]
}

impl AnalyticsConfig {
    pub fn with_starting_capital(mut self, capital: Money) -> Self {
        self.starting_capital = capital;
        self
    }

    pub fn validate(&self) -> JournalResult<()> {
        if self.starting_capital <= Decimal::ZERO {
            return Err(JournalError::invalid(
                "starting_capital",
                "Starting capital must be positive",
            ));
        }
        if self.pnl_scale <= Decimal::ZERO {
            return Err(JournalError::invalid(
                "pnl_scale",
                "P&L scale must be positive",
            ));
        }
        validate_risk_levels(&self.risk_levels)?;
        if self.hour_range.start > self.hour_range.end || self.hour_range.end > 23 {
            return Err(JournalError::invalid(
                "hour_range",
                format!(
                    "Hour range {}..={} must be ascending and within 0..=23",
                    self.hour_range.start, self.hour_range.end
                ),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_risk_levels(levels: &[Decimal]) -> JournalResult<()> {
    for level in levels {
        if *level <= Decimal::ZERO || *level > dec!(100) {
            return Err(JournalError::invalid(
                "risk_levels",
                format!("Risk per trade {level}% must be within (0, 100]"),
            ));
        }
    }
    Ok(())
}
