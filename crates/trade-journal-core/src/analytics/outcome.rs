//! Outcome-to-return normalization.
//!
//! Every call site that sums returns goes through [`realized_return`] or
//! [`realized_pnl`]. Returns are in journal units; currency P&L is the return
//! times a single notional (`pnl_scale`), so a partial trade is always worth
//! half its target in both views.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::trade::{Outcome, TradeRecord};
use crate::types::{Money, ReturnUnits};

const PARTIAL_FRACTION: Decimal = dec!(0.5);

/// Realized return of a trade in journal units.
pub fn realized_return(trade: &TradeRecord) -> ReturnUnits {
    match trade.outcome {
        Outcome::Target => trade.target,
        Outcome::StopLoss => -trade.stop_loss,
        Outcome::Partial => trade.target * PARTIAL_FRACTION,
        Outcome::Breakeven | Outcome::Unfilled => Decimal::ZERO,
    }
}

/// Realized currency P&L of a trade.
pub fn realized_pnl(trade: &TradeRecord, pnl_scale: Decimal) -> Money {
    realized_return(trade) * pnl_scale
}

/// Win/loss tallies and gross magnitudes over a set of trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WinLossTally {
    pub wins: u32,
    pub losses: u32,
    pub neutral: u32,
    /// Sum of winning returns (units)
    pub gross_win: ReturnUnits,
    /// Sum of losing magnitudes (units, positive)
    pub gross_loss: ReturnUnits,
}

impl WinLossTally {
    pub fn from_trades<'a>(trades: impl IntoIterator<Item = &'a TradeRecord>) -> Self {
        let mut tally = WinLossTally::default();
        for trade in trades {
            tally.add(trade);
        }
        tally
    }

    pub fn add(&mut self, trade: &TradeRecord) {
        let r = realized_return(trade);
        if trade.outcome.is_win() {
            self.wins += 1;
            self.gross_win += r;
        } else if trade.outcome.is_loss() {
            self.losses += 1;
            self.gross_loss += r.abs();
        } else {
            self.neutral += 1;
        }
    }

    pub fn decided(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.neutral
    }

    pub fn average_win(&self) -> Option<ReturnUnits> {
        (self.wins > 0).then(|| self.gross_win / Decimal::from(self.wins))
    }

    pub fn average_loss(&self) -> Option<ReturnUnits> {
        (self.losses > 0).then(|| self.gross_loss / Decimal::from(self.losses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::trade;

    #[test]
    fn test_mapping() {
        assert_eq!(realized_return(&trade(Outcome::Target, dec!(2), dec!(1))), dec!(2));
        assert_eq!(realized_return(&trade(Outcome::StopLoss, dec!(2), dec!(1))), dec!(-1));
        assert_eq!(realized_return(&trade(Outcome::Partial, dec!(2), dec!(1))), dec!(1));
        assert_eq!(realized_return(&trade(Outcome::Breakeven, dec!(2), dec!(1))), Decimal::ZERO);
        assert_eq!(realized_return(&trade(Outcome::Unfilled, dec!(2), dec!(1))), Decimal::ZERO);
    }

    #[test]
    fn test_partial_scales_like_target() {
        let partial = trade(Outcome::Partial, dec!(3), dec!(1));
        let full = trade(Outcome::Target, dec!(3), dec!(1));
        assert_eq!(
            realized_pnl(&partial, dec!(100)) * dec!(2),
            realized_pnl(&full, dec!(100))
        );
        assert_eq!(realized_pnl(&partial, dec!(100)), dec!(150));
    }

    #[test]
    fn test_tally() {
        let trades = vec![
            trade(Outcome::Target, dec!(2), dec!(1)),
            trade(Outcome::StopLoss, dec!(2), dec!(1)),
            trade(Outcome::Partial, dec!(2), dec!(1)),
            trade(Outcome::Unfilled, dec!(2), dec!(1)),
        ];
        let t = WinLossTally::from_trades(&trades);
        assert_eq!(t.wins, 2);
        assert_eq!(t.losses, 1);
        assert_eq!(t.neutral, 1);
        assert_eq!(t.gross_win, dec!(3));
        assert_eq!(t.gross_loss, dec!(1));
        assert_eq!(t.average_win(), Some(dec!(1.5)));
        assert_eq!(t.average_loss(), Some(dec!(1)));
    }

    #[test]
    fn test_empty_tally_has_no_averages() {
        let t = WinLossTally::from_trades(&[]);
        assert_eq!(t.total(), 0);
        assert!(t.average_win().is_none());
        assert!(t.average_loss().is_none());
    }
}
