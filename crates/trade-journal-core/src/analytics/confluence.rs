use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::trade::{Outcome, TradeRecord};
use crate::types::{ratio, win_rate, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfluenceSide {
    Pro,
    Contra,
}

/// Number of trades per outcome value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub target: u32,
    pub stop_loss: u32,
    pub breakeven: u32,
    pub partial: u32,
    pub unfilled: u32,
}

impl OutcomeCounts {
    pub fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Target => self.target += 1,
            Outcome::StopLoss => self.stop_loss += 1,
            Outcome::Breakeven => self.breakeven += 1,
            Outcome::Partial => self.partial += 1,
            Outcome::Unfilled => self.unfilled += 1,
        }
    }

    pub fn get(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Target => self.target,
            Outcome::StopLoss => self.stop_loss,
            Outcome::Breakeven => self.breakeven,
            Outcome::Partial => self.partial,
            Outcome::Unfilled => self.unfilled,
        }
    }

    pub fn total(&self) -> u32 {
        self.target + self.stop_loss + self.breakeven + self.partial + self.unfilled
    }

    pub fn wins(&self) -> u32 {
        self.target + self.partial
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagStats {
    pub tag: String,
    pub total: u32,
    pub outcomes: OutcomeCounts,
    /// (target + partial) / total
    pub win_rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodStats {
    pub emotion: String,
    pub total: u32,
    pub outcomes: OutcomeCounts,
    pub win_rate: Rate,
    /// Fraction of all trades carrying this emotion
    pub share: Rate,
}

fn ranked(counts: BTreeMap<String, OutcomeCounts>) -> Vec<TagStats> {
    // BTreeMap iterates in tag order; the stable sort keeps it for equal totals
    let mut stats: Vec<TagStats> = counts
        .into_iter()
        .map(|(tag, outcomes)| TagStats {
            tag,
            total: outcomes.total(),
            win_rate: win_rate(outcomes.wins(), outcomes.total()),
            outcomes,
        })
        .collect();
    stats.sort_by(|a, b| b.total.cmp(&a.total));
    stats
}

/// Per-tag outcome counts for one side of the confluence lists. A trade
/// counts once per distinct tag it carries.
pub fn confluence_stats(trades: &[TradeRecord], side: ConfluenceSide) -> Vec<TagStats> {
    let mut counts: BTreeMap<String, OutcomeCounts> = BTreeMap::new();
    for trade in trades {
        let tags = match side {
            ConfluenceSide::Pro => &trade.confluences_pro,
            ConfluenceSide::Contra => &trade.confluences_contra,
        };
        let mut seen: Vec<&str> = Vec::with_capacity(tags.len());
        for tag in tags {
            let tag = tag.trim();
            if tag.is_empty() || seen.contains(&tag) {
                continue;
            }
            seen.push(tag);
            counts.entry(tag.to_string()).or_default().add(trade.outcome);
        }
    }
    ranked(counts)
}

/// Per-emotion outcome counts. Trades with an empty emotion are skipped.
pub fn mood_stats(trades: &[TradeRecord]) -> Vec<MoodStats> {
    let mut counts: BTreeMap<String, OutcomeCounts> = BTreeMap::new();
    for trade in trades {
        let emotion = trade.emotion.trim();
        if emotion.is_empty() {
            continue;
        }
        counts.entry(emotion.to_string()).or_default().add(trade.outcome);
    }

    let all = Decimal::from(trades.len());
    ranked(counts)
        .into_iter()
        .map(|s| MoodStats {
            share: ratio(Decimal::from(s.total), all),
            emotion: s.tag,
            total: s.total,
            outcomes: s.outcomes,
            win_rate: s.win_rate,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::trade;
    use rust_decimal_macros::dec;

    fn tagged(outcome: Outcome, pro: &[&str], contra: &[&str], emotion: &str) -> TradeRecord {
        TradeRecord {
            confluences_pro: pro.iter().map(|s| s.to_string()).collect(),
            confluences_contra: contra.iter().map(|s| s.to_string()).collect(),
            emotion: emotion.to_string(),
            ..trade(outcome, dec!(2), dec!(1))
        }
    }

    #[test]
    fn test_pro_confluence_counts() {
        let trades = vec![
            tagged(Outcome::Target, &["FVG", "OB"], &[], "calm"),
            tagged(Outcome::StopLoss, &["FVG"], &["news"], "fomo"),
            tagged(Outcome::Partial, &["FVG", "OB"], &[], "calm"),
            tagged(Outcome::Unfilled, &["OB"], &[], "calm"),
        ];
        let stats = confluence_stats(&trades, ConfluenceSide::Pro);
        assert_eq!(stats.len(), 2);
        // FVG and OB both have 3; tag ascending breaks the tie
        assert_eq!(stats[0].tag, "FVG");
        assert_eq!(stats[0].total, 3);
        assert_eq!(stats[0].outcomes.target, 1);
        assert_eq!(stats[0].outcomes.stop_loss, 1);
        assert_eq!(stats[0].outcomes.partial, 1);
        assert_eq!(stats[0].win_rate.round_dp(4), dec!(0.6667));
        assert_eq!(stats[1].tag, "OB");
        assert_eq!(stats[1].outcomes.unfilled, 1);
    }

    #[test]
    fn test_contra_side() {
        let trades = vec![
            tagged(Outcome::StopLoss, &["FVG"], &["news", "news"], ""),
            tagged(Outcome::StopLoss, &[], &["news"], ""),
        ];
        let stats = confluence_stats(&trades, ConfluenceSide::Contra);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total, 2);
        assert_eq!(stats[0].win_rate, Decimal::ZERO);
    }

    #[test]
    fn test_ordering_by_total_desc() {
        let trades = vec![
            tagged(Outcome::Target, &["b"], &[], ""),
            tagged(Outcome::Target, &["a"], &[], ""),
            tagged(Outcome::Target, &["b"], &[], ""),
        ];
        let stats = confluence_stats(&trades, ConfluenceSide::Pro);
        let tags: Vec<&str> = stats.iter().map(|s| s.tag.as_str()).collect();
        assert_eq!(tags, vec!["b", "a"]);
    }

    #[test]
    fn test_mood_stats_share() {
        let trades = vec![
            tagged(Outcome::Target, &[], &[], "calm"),
            tagged(Outcome::StopLoss, &[], &[], "fomo"),
            tagged(Outcome::Target, &[], &[], "calm"),
            tagged(Outcome::Breakeven, &[], &[], ""),
        ];
        let moods = mood_stats(&trades);
        assert_eq!(moods.len(), 2);
        assert_eq!(moods[0].emotion, "calm");
        assert_eq!(moods[0].share, dec!(0.5));
        assert_eq!(moods[0].win_rate, dec!(1));
        assert_eq!(moods[1].emotion, "fomo");
        assert_eq!(moods[1].share, dec!(0.25));
    }

    #[test]
    fn test_empty() {
        assert!(confluence_stats(&[], ConfluenceSide::Pro).is_empty());
        assert!(mood_stats(&[]).is_empty());
    }

    #[test]
    fn test_outcome_counts_get_matches_add() {
        let mut c = OutcomeCounts::default();
        for o in Outcome::ALL {
            c.add(o);
        }
        assert!(Outcome::ALL.iter().all(|o| c.get(*o) == 1));
        assert_eq!(c.total(), 5);
        assert_eq!(c.wins(), 2);
    }
}
