//! Day-of-week, hour-of-day and calendar-month aggregation.

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::outcome::realized_pnl;
use crate::config::{AnalyticsConfig, HourRange};
use crate::trade::{Classification, TradeRecord};
use crate::types::{win_rate, Money, Rate};

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Count aggregate for one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub key: String,
    pub trades: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: Rate,
}

impl BucketStats {
    fn new(key: impl Into<String>) -> Self {
        BucketStats {
            key: key.into(),
            trades: 0,
            wins: 0,
            losses: 0,
            win_rate: Decimal::ZERO,
        }
    }

    fn add(&mut self, trade: &TradeRecord) {
        self.trades += 1;
        match trade.outcome.classification() {
            Classification::Win => self.wins += 1,
            Classification::Loss => self.losses += 1,
            Classification::Neutral => {}
        }
    }

    fn finish(mut self) -> Self {
        self.win_rate = win_rate(self.wins, self.trades);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourBucket {
    pub hour: u32,
    #[serde(flatten)]
    pub stats: BucketStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    /// `YYYY-MM`
    pub label: String,
    pub trades: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: Rate,
    pub pnl: Money,
    /// Equity at month end, carried forward from the starting capital
    pub equity: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub months: Vec<MonthBucket>,
    pub best_month: Option<MonthBucket>,
    pub worst_month: Option<MonthBucket>,
    pub average_monthly_pnl: Money,
}

// ---------------------------------------------------------------------------
// Day of week
// ---------------------------------------------------------------------------

/// Seven buckets, index 0 = Sunday.
pub fn performance_by_weekday(trades: &[TradeRecord]) -> Vec<BucketStats> {
    let mut buckets: Vec<BucketStats> = WEEKDAY_LABELS.iter().map(|l| BucketStats::new(*l)).collect();
    for trade in trades {
        let idx = trade.date.weekday().num_days_from_sunday() as usize;
        buckets[idx].add(trade);
    }
    buckets.into_iter().map(BucketStats::finish).collect()
}

// ---------------------------------------------------------------------------
// Hour of day
// ---------------------------------------------------------------------------

/// One bucket per hour of the inclusive range. Trades without a time, or
/// outside the range, are left out.
pub fn performance_by_hour(trades: &[TradeRecord], range: HourRange) -> Vec<HourBucket> {
    let mut buckets: Vec<HourBucket> = (range.start..=range.end)
        .map(|hour| HourBucket {
            hour,
            stats: BucketStats::new(format!("{hour:02}:00")),
        })
        .collect();

    for trade in trades {
        let Some(time) = trade.time else { continue };
        let hour = time.hour();
        if hour < range.start || hour > range.end {
            continue;
        }
        buckets[(hour - range.start) as usize].stats.add(trade);
    }

    buckets
        .into_iter()
        .map(|b| HourBucket {
            hour: b.hour,
            stats: b.stats.finish(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Month
// ---------------------------------------------------------------------------

pub fn monthly_breakdown(trades: &[TradeRecord], config: &AnalyticsConfig) -> Vec<MonthBucket> {
    let mut grouped: BTreeMap<(i32, u32), (BucketStats, Money)> = BTreeMap::new();
    for trade in trades {
        let key = (trade.date.year(), trade.date.month());
        let entry = grouped
            .entry(key)
            .or_insert_with(|| (BucketStats::new(format!("{:04}-{:02}", key.0, key.1)), Decimal::ZERO));
        entry.0.add(trade);
        entry.1 += realized_pnl(trade, config.pnl_scale);
    }

    let mut equity = config.starting_capital;
    grouped
        .into_iter()
        .map(|((year, month), (stats, pnl))| {
            let stats = stats.finish();
            equity += pnl;
            MonthBucket {
                year,
                month,
                label: stats.key,
                trades: stats.trades,
                wins: stats.wins,
                losses: stats.losses,
                win_rate: stats.win_rate,
                pnl,
                equity,
            }
        })
        .collect()
}

/// Month buckets plus best, worst and average monthly P&L. Ties keep the
/// earliest month.
pub fn monthly_summary(trades: &[TradeRecord], config: &AnalyticsConfig) -> MonthlySummary {
    let months = monthly_breakdown(trades, config);

    let mut best: Option<&MonthBucket> = None;
    let mut worst: Option<&MonthBucket> = None;
    for m in &months {
        if best.map_or(true, |b| m.pnl > b.pnl) {
            best = Some(m);
        }
        if worst.map_or(true, |w| m.pnl < w.pnl) {
            worst = Some(m);
        }
    }

    let total: Money = months.iter().map(|m| m.pnl).sum();
    let average_monthly_pnl = if months.is_empty() {
        Decimal::ZERO
    } else {
        total / Decimal::from(months.len())
    };

    MonthlySummary {
        best_month: best.cloned(),
        worst_month: worst.cloned(),
        average_monthly_pnl,
        months,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
