use crate::trade::TradeRecord;

/// Trades in ascending (date, time) order; a missing time sorts as midnight.
/// The sort is stable, so identical timestamps keep their input order.
pub fn chronological(trades: &[TradeRecord]) -> Vec<&TradeRecord> {
    let mut ordered: Vec<&TradeRecord> = trades.iter().collect();
    ordered.sort_by_key(|t| (t.date, t.sort_time()));
    ordered
}
