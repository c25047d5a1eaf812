use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::outcome::realized_pnl;
use crate::config::AnalyticsConfig;
use crate::trade::{Classification, Direction, Outcome, TradeRecord};
use crate::types::{win_rate, Money, Rate};

// ---------------------------------------------------------------------------
// Outcome breakdown by direction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDirectionSplit {
    pub outcome: Outcome,
    pub total: u32,
    pub long: u32,
    pub short: u32,
    pub long_share: Rate,
    pub short_share: Rate,
}

/// One row per outcome value, in `Outcome::ALL` order.
pub fn outcome_breakdown(trades: &[TradeRecord]) -> Vec<OutcomeDirectionSplit> {
    Outcome::ALL
        .iter()
        .map(|&outcome| {
            let (long, short) = trades
                .iter()
                .filter(|t| t.outcome == outcome)
                .fold((0u32, 0u32), |(l, s), t| match t.direction {
                    Direction::Long => (l + 1, s),
                    Direction::Short => (l, s + 1),
                });
            let total = long + short;
            OutcomeDirectionSplit {
                outcome,
                total,
                long,
                short,
                long_share: win_rate(long, total),
                short_share: win_rate(short, total),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pair performance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairStats {
    pub pair: String,
    pub trades: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: Rate,
    pub pnl: Money,
}

/// Per-instrument results, best P&L first; ties by pair name.
pub fn pair_performance(trades: &[TradeRecord], config: &AnalyticsConfig) -> Vec<PairStats> {
    let mut grouped: BTreeMap<&str, PairStats> = BTreeMap::new();
    for trade in trades {
        let entry = grouped.entry(trade.pair.as_str()).or_insert_with(|| PairStats {
            pair: trade.pair.clone(),
            trades: 0,
            wins: 0,
            losses: 0,
            win_rate: Decimal::ZERO,
            pnl: Decimal::ZERO,
        });
        entry.trades += 1;
        match trade.outcome.classification() {
            Classification::Win => entry.wins += 1,
            Classification::Loss => entry.losses += 1,
            Classification::Neutral => {}
        }
        entry.pnl += realized_pnl(trade, config.pnl_scale);
    }

    let mut stats: Vec<PairStats> = grouped
        .into_values()
        .map(|mut s| {
            s.win_rate = win_rate(s.wins, s.trades);
            s
        })
        .collect();
    stats.sort_by(|a, b| b.pnl.cmp(&a.pnl));
    stats
}

// ---------------------------------------------------------------------------
// R-multiple distribution
// ---------------------------------------------------------------------------

pub const R_BUCKETS: [&str; 9] = [
    "< -1", "-1", "-1 to 0", "0", "0 to 1", "1 to 2", "2 to 3", "3 to 4", "> 4",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RBucket {
    pub range: String,
    pub count: u32,
}

/// Planned reward-to-risk: the logged `rr` when positive, else target / stop.
fn planned_r(trade: &TradeRecord) -> Option<Decimal> {
    match trade.rr {
        Some(rr) if rr > Decimal::ZERO => Some(rr),
        _ if trade.target > Decimal::ZERO && trade.stop_loss > Decimal::ZERO => {
            Some(trade.target / trade.stop_loss)
        }
        _ => None,
    }
}

/// Realized R multiple of a trade. Unfilled trades and wins without a
/// computable planned R have none.
pub fn realized_r(trade: &TradeRecord) -> Option<Decimal> {
    match trade.outcome {
        Outcome::StopLoss => Some(-Decimal::ONE),
        Outcome::Breakeven => Some(Decimal::ZERO),
        Outcome::Target => planned_r(trade),
        Outcome::Partial => planned_r(trade).map(|r| r / Decimal::TWO),
        Outcome::Unfilled => None,
    }
}

/// Negative side closed at -1; positive buckets are `(0, 1)` then `[n, n + 1)`,
/// so a whole-R win lands in the bucket it opens.
fn bucket_index(r: Decimal) -> usize {
    let one = Decimal::ONE;
    if r < -one {
        0
    } else if r == -one {
        1
    } else if r < Decimal::ZERO {
        2
    } else if r.is_zero() {
        3
    } else if r < one {
        4
    } else if r < Decimal::TWO {
        5
    } else if r < Decimal::from(3) {
        6
    } else if r < Decimal::from(4) {
        7
    } else {
        8
    }
}

pub fn r_multiple_distribution(trades: &[TradeRecord]) -> Vec<RBucket> {
    let mut counts = [0u32; 9];
    for r in trades.iter().filter_map(realized_r) {
        counts[bucket_index(r)] += 1;
    }
    R_BUCKETS
        .iter()
        .zip(counts)
        .map(|(range, count)| RBucket {
            range: range.to_string(),
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::trade;
    use rust_decimal_macros::dec;

    fn on(pair: &str, direction: Direction, outcome: Outcome) -> TradeRecord {
        TradeRecord {
            pair: pair.into(),
            direction,
            ..trade(outcome, dec!(2), dec!(1))
        }
    }

    #[test]
    fn test_outcome_breakdown_shares() {
        let trades = vec![
            on("EURUSD", Direction::Long, Outcome::Target),
            on("EURUSD", Direction::Short, Outcome::Target),
            on("EURUSD", Direction::Long, Outcome::Target),
            on("EURUSD", Direction::Short, Outcome::StopLoss),
        ];
        let rows = outcome_breakdown(&trades);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].outcome, Outcome::Target);
        assert_eq!(rows[0].long, 2);
        assert_eq!(rows[0].short, 1);
        assert_eq!(rows[0].long_share.round_dp(4), dec!(0.6667));
        assert_eq!(rows[1].short_share, dec!(1));
        assert_eq!(rows[2].total, 0);
        assert_eq!(rows[2].long_share, Decimal::ZERO);
    }

    #[test]
    fn test_pair_performance_ordering() {
        let trades = vec![
            on("GBPUSD", Direction::Long, Outcome::StopLoss),
            on("EURUSD", Direction::Long, Outcome::Target),
            on("XAUUSD", Direction::Long, Outcome::Breakeven),
            on("AUDUSD", Direction::Long, Outcome::Unfilled),
            on("EURUSD", Direction::Short, Outcome::StopLoss),
        ];
        let stats = pair_performance(&trades, &AnalyticsConfig::default());
        let pairs: Vec<&str> = stats.iter().map(|s| s.pair.as_str()).collect();
        // EURUSD +100, AUDUSD 0, XAUUSD 0, GBPUSD -100
        assert_eq!(pairs, vec!["EURUSD", "AUDUSD", "XAUUSD", "GBPUSD"]);
        assert_eq!(stats[0].pnl, dec!(100));
        assert_eq!(stats[0].trades, 2);
        assert_eq!(stats[0].win_rate, dec!(0.5));
    }

    #[test]
    fn test_realized_r() {
        let mut logged = trade(Outcome::Target, dec!(2), dec!(1));
        logged.rr = Some(dec!(3));
        assert_eq!(realized_r(&logged), Some(dec!(3)));
        assert_eq!(realized_r(&trade(Outcome::Target, dec!(2), dec!(1))), Some(dec!(2)));
        assert_eq!(realized_r(&trade(Outcome::Partial, dec!(3), dec!(1))), Some(dec!(1.5)));
        assert_eq!(realized_r(&trade(Outcome::StopLoss, dec!(2), dec!(1))), Some(dec!(-1)));
        assert_eq!(realized_r(&trade(Outcome::Breakeven, dec!(2), dec!(1))), Some(Decimal::ZERO));
        assert_eq!(realized_r(&trade(Outcome::Unfilled, dec!(2), dec!(1))), None);
        assert_eq!(realized_r(&trade(Outcome::Target, dec!(2), dec!(0))), None);
    }

    #[test]
    fn test_r_distribution_buckets() {
        let trades = vec![
            trade(Outcome::StopLoss, dec!(2), dec!(1)),
            trade(Outcome::Breakeven, dec!(2), dec!(1)),
            trade(Outcome::Target, dec!(1), dec!(1)),
            trade(Outcome::Target, dec!(2.5), dec!(1)),
            trade(Outcome::Target, dec!(6), dec!(1)),
            trade(Outcome::Unfilled, dec!(2), dec!(1)),
        ];
        let dist = r_multiple_distribution(&trades);
        let counts: Vec<u32> = dist.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![0, 1, 0, 1, 0, 1, 1, 0, 1]);
        assert_eq!(dist[8].range, "> 4");
    }

    #[test]
    fn test_whole_r_opens_its_bucket() {
        let range_of = |target| {
            let dist = r_multiple_distribution(&[trade(Outcome::Target, target, dec!(1))]);
            dist.into_iter().find(|b| b.count == 1).map(|b| b.range)
        };
        assert_eq!(range_of(dec!(0.5)).as_deref(), Some("0 to 1"));
        assert_eq!(range_of(dec!(1)).as_deref(), Some("1 to 2"));
        assert_eq!(range_of(dec!(2)).as_deref(), Some("2 to 3"));
        assert_eq!(range_of(dec!(3)).as_deref(), Some("3 to 4"));
        assert_eq!(range_of(dec!(3.99)).as_deref(), Some("3 to 4"));
        assert_eq!(range_of(dec!(4)).as_deref(), Some("> 4"));
    }
}
