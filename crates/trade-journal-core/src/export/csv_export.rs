//! Spreadsheet export of the journal.
//!
//! Every cell is quoted and the file starts with a UTF-8 byte order mark so
//! spreadsheet applications detect the encoding. Confluence lists are joined
//! with `"; "`.

use std::io::{Read, Write};

use chrono::{NaiveTime, Timelike};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::outcome::realized_pnl;
use crate::trade::TradeRecord;
use crate::{JournalError, JournalResult};

const BOM: &str = "\u{feff}";
const TAG_SEPARATOR: &str = "; ";

pub const CSV_COLUMNS: [&str; 12] = [
    "date",
    "time",
    "pair",
    "direction",
    "target",
    "stop_loss",
    "outcome",
    "pnl",
    "emotion",
    "confluences_pro",
    "confluences_contra",
    "notes",
];

/// One exported row; every field is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    pub date: String,
    pub time: String,
    pub pair: String,
    pub direction: String,
    pub target: String,
    pub stop_loss: String,
    pub outcome: String,
    pub pnl: String,
    pub emotion: String,
    pub confluences_pro: String,
    pub confluences_contra: String,
    pub notes: String,
}

/// `HH:MM`, or `HH:MM:SS` when the seconds are set.
fn format_time(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

impl CsvRow {
    pub fn from_trade(trade: &TradeRecord, pnl_scale: Decimal) -> Self {
        CsvRow {
            date: trade.date.format("%Y-%m-%d").to_string(),
            time: trade.time.map(format_time).unwrap_or_default(),
            pair: trade.pair.clone(),
            direction: trade.direction.label().to_string(),
            target: format!("{:.5}", trade.target),
            stop_loss: format!("{:.5}", trade.stop_loss),
            outcome: trade.outcome.as_str().to_string(),
            pnl: format!("{:.2}", realized_pnl(trade, pnl_scale)),
            emotion: trade.emotion.clone(),
            confluences_pro: trade.confluences_pro.join(TAG_SEPARATOR),
            confluences_contra: trade.confluences_contra.join(TAG_SEPARATOR),
            notes: trade.notes.clone(),
        }
    }

    /// Split a joined confluence cell back into tags.
    pub fn split_tags(cell: &str) -> Vec<String> {
        cell.split(TAG_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Write the journal as CSV, one row per trade in input order.
pub fn export_csv<W: Write>(
    mut writer: W,
    trades: &[TradeRecord],
    pnl_scale: Decimal,
) -> JournalResult<()> {
    writer.write_all(BOM.as_bytes())?;
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);
    if trades.is_empty() {
        wtr.write_record(CSV_COLUMNS)?;
    }
    for trade in trades {
        wtr.serialize(CsvRow::from_trade(trade, pnl_scale))?;
    }
    wtr.flush()?;
    tracing::debug!(rows = trades.len(), "exported journal csv");
    Ok(())
}

pub fn to_csv_string(trades: &[TradeRecord], pnl_scale: Decimal) -> JournalResult<String> {
    let mut buf = Vec::new();
    export_csv(&mut buf, trades, pnl_scale)?;
    String::from_utf8(buf).map_err(|e| JournalError::Csv(e.to_string()))
}

/// Read an export back into rows. A leading byte order mark is ignored.
pub fn parse_csv<R: Read>(mut reader: R) -> JournalResult<Vec<CsvRow>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let body = text.strip_prefix(BOM).unwrap_or(&text);

    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(body.as_bytes());
    let rows = rdr
        .deserialize::<CsvRow>()
        .collect::<Result<Vec<_>, csv::Error>>()?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::dated;
    use crate::trade::{Direction, Outcome};
    use rust_decimal_macros::dec;

    fn noted(notes: &str) -> TradeRecord {
        TradeRecord {
            notes: notes.to_string(),
            emotion: "calm".into(),
            confluences_pro: vec!["FVG".into(), "OB".into()],
            confluences_contra: vec!["news".into()],
            direction: Direction::Short,
            ..dated((2025, 1, 6), Some((9, 5)), Outcome::Partial, dec!(2), dec!(1))
        }
    }

    #[test]
    fn test_header_bom_and_quoting() {
        let out = to_csv_string(&[noted("plain")], dec!(100)).unwrap();
        assert!(out.starts_with("\u{feff}\"date\",\"time\",\"pair\""));
        let data_line = out.lines().nth(1).unwrap();
        assert_eq!(
            data_line,
            "\"2025-01-06\",\"09:05\",\"EURUSD\",\"Short\",\"2.00000\",\"1.00000\",\
             \"partial\",\"100.00\",\"calm\",\"FVG; OB\",\"news\",\"plain\""
        );
    }

    #[test]
    fn test_round_trip_notes_with_commas_and_quotes() {
        let notes = "Entered late, \"chased\" the move\nnext line";
        let out = to_csv_string(&[noted(notes)], dec!(100)).unwrap();
        assert!(out.contains("\"\"chased\"\""));
        let rows = parse_csv(out.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].notes, notes);
        assert_eq!(rows[0].emotion, "calm");
        assert_eq!(CsvRow::split_tags(&rows[0].confluences_pro), vec!["FVG", "OB"]);
    }

    #[test]
    fn test_empty_journal_has_header_only() {
        let out = to_csv_string(&[], dec!(100)).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(parse_csv(out.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_time_is_blank_and_loss_is_negative() {
        let t = dated((2025, 1, 7), None, Outcome::StopLoss, dec!(2), dec!(1.5));
        let row = CsvRow::from_trade(&t, dec!(100));
        assert_eq!(row.time, "");
        assert_eq!(row.pnl, "-150.00");
    }

    #[test]
    fn test_time_keeps_seconds_only_when_set() {
        let mut t = dated((2025, 1, 7), Some((14, 5)), Outcome::Target, dec!(2), dec!(1));
        assert_eq!(CsvRow::from_trade(&t, dec!(100)).time, "14:05");
        t.time = NaiveTime::from_hms_opt(14, 5, 30);
        let out = to_csv_string(&[t], dec!(100)).unwrap();
        assert_eq!(parse_csv(out.as_bytes()).unwrap()[0].time, "14:05:30");
    }

    #[test]
    fn test_parse_without_bom() {
        let header = CSV_COLUMNS.join(",");
        let text = format!("{header}\n2025-01-06,,EURUSD,Long,2,1,target,200,,,,ok\n");
        let rows = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(rows[0].outcome, "target");
        assert_eq!(rows[0].notes, "ok");
    }
}
