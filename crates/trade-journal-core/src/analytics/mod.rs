pub mod breakdown;
pub mod confluence;
pub mod equity;
pub mod filter;
pub mod goals;
pub mod ordering;
pub mod outcome;
pub mod projection;
pub mod report;
pub mod risk_of_ruin;
pub mod streaks;
pub mod summary;
pub mod temporal;
pub mod weekly;

pub use outcome::{realized_pnl, realized_return};
pub use report::{analyze_journal, JournalInput, JournalReport};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    use crate::trade::{Direction, Outcome, TradeRecord};

    pub fn trade(outcome: Outcome, target: Decimal, stop: Decimal) -> TradeRecord {
        TradeRecord {
            id: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            time: None,
            pair: "EURUSD".into(),
            direction: Direction::Long,
            target,
            stop_loss: stop,
            outcome,
            rr: None,
            emotion: String::new(),
            confluences_pro: vec![],
            confluences_contra: vec![],
            notes: String::new(),
            image_urls: vec![],
        }
    }

    pub fn dated(
        date: (i32, u32, u32),
        time: Option<(u32, u32)>,
        outcome: Outcome,
        target: Decimal,
        stop: Decimal,
    ) -> TradeRecord {
        TradeRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: time.map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap()),
            ..trade(outcome, target, stop)
        }
    }
}
