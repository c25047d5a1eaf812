use serde::{Deserialize, Serialize};

use crate::analytics::ordering::chronological;
use crate::trade::{Classification, TradeRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakKind {
    Win,
    Loss,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub current_streak_kind: StreakKind,
    pub max_win_streak: u32,
    pub max_loss_streak: u32,
}

/// Consecutive win/loss runs over the chronologically ordered trades.
/// Breakeven and unfilled trades break both runs.
pub fn detect_streaks(trades: &[TradeRecord]) -> StreakSummary {
    let mut max_win_streak: u32 = 0;
    let mut max_loss_streak: u32 = 0;
    let mut cur_wins: u32 = 0;
    let mut cur_losses: u32 = 0;
    let mut last = Classification::Neutral;

    for trade in chronological(trades) {
        last = trade.outcome.classification();
        match last {
            Classification::Win => {
                cur_wins += 1;
                cur_losses = 0;
                max_win_streak = max_win_streak.max(cur_wins);
            }
            Classification::Loss => {
                cur_losses += 1;
                cur_wins = 0;
                max_loss_streak = max_loss_streak.max(cur_losses);
            }
            Classification::Neutral => {
                cur_wins = 0;
                cur_losses = 0;
            }
        }
    }

    let (current_streak, current_streak_kind) = match last {
        Classification::Win => (cur_wins, StreakKind::Win),
        Classification::Loss => (cur_losses, StreakKind::Loss),
        Classification::Neutral => (0, StreakKind::None),
    };

    StreakSummary {
        current_streak,
        current_streak_kind,
        max_win_streak,
        max_loss_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::dated;
    use crate::trade::Outcome;
    use rust_decimal_macros::dec;

    fn sequence(outcomes: &[Outcome]) -> Vec<TradeRecord> {
        outcomes
            .iter()
            .enumerate()
            .map(|(i, o)| dated((2025, 6, (i + 1) as u32), None, *o, dec!(2), dec!(1)))
            .collect()
    }

    #[test]
    fn test_consecutive_streaks() {
        use Outcome::*;
        // W, W, W, L, L, W, L
        let s = detect_streaks(&sequence(&[
            Target, Partial, Target, StopLoss, StopLoss, Target, StopLoss,
        ]));
        assert_eq!(s.max_win_streak, 3);
        assert_eq!(s.max_loss_streak, 2);
        assert_eq!(s.current_streak, 1);
        assert_eq!(s.current_streak_kind, StreakKind::Loss);
    }

    #[test]
    fn test_neutral_resets_both() {
        use Outcome::*;
        let s = detect_streaks(&sequence(&[Target, Target, Breakeven, Target]));
        assert_eq!(s.max_win_streak, 2);
        assert_eq!(s.current_streak, 1);
        assert_eq!(s.current_streak_kind, StreakKind::Win);
    }

    #[test]
    fn test_last_neutral_has_no_current_streak() {
        use Outcome::*;
        let s = detect_streaks(&sequence(&[StopLoss, StopLoss, Unfilled]));
        assert_eq!(s.max_loss_streak, 2);
        assert_eq!(s.current_streak, 0);
        assert_eq!(s.current_streak_kind, StreakKind::None);
    }

    #[test]
    fn test_empty() {
        let s = detect_streaks(&[]);
        assert_eq!(
            s,
            StreakSummary {
                current_streak: 0,
                current_streak_kind: StreakKind::None,
                max_win_streak: 0,
                max_loss_streak: 0,
            }
        );
    }

    #[test]
    fn test_uses_chronological_order() {
        use Outcome::*;
        let mut trades = sequence(&[StopLoss, Target, Target]);
        trades.reverse();
        let s = detect_streaks(&trades);
        assert_eq!(s.current_streak_kind, StreakKind::Win);
        assert_eq!(s.current_streak, 2);
    }
}
