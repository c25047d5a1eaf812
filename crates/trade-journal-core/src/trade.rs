use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{JournalError, JournalResult};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }
}

impl FromStr for Direction {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" | "buy" => Ok(Direction::Long),
            "short" | "sell" => Ok(Direction::Short),
            other => Err(JournalError::invalid(
                "direction",
                format!("Unknown direction '{other}'. Use: long, short"),
            )),
        }
    }
}

/// Categorical result of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Target,
    StopLoss,
    Breakeven,
    #[serde(alias = "parziale")]
    Partial,
    #[serde(alias = "non_fillato")]
    Unfilled,
}

/// Win/loss classification derived from an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Win,
    Loss,
    Neutral,
}

impl Outcome {
    pub const ALL: [Outcome; 5] = [
        Outcome::Target,
        Outcome::StopLoss,
        Outcome::Breakeven,
        Outcome::Partial,
        Outcome::Unfilled,
    ];

    pub fn classification(self) -> Classification {
        match self {
            Outcome::Target | Outcome::Partial => Classification::Win,
            Outcome::StopLoss => Classification::Loss,
            Outcome::Breakeven | Outcome::Unfilled => Classification::Neutral,
        }
    }

    pub fn is_win(self) -> bool {
        self.classification() == Classification::Win
    }

    pub fn is_loss(self) -> bool {
        self.classification() == Classification::Loss
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Target => "target",
            Outcome::StopLoss => "stop_loss",
            Outcome::Breakeven => "breakeven",
            Outcome::Partial => "partial",
            Outcome::Unfilled => "unfilled",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "target" | "take_profit" => Ok(Outcome::Target),
            "stop_loss" | "stop" => Ok(Outcome::StopLoss),
            "breakeven" => Ok(Outcome::Breakeven),
            "partial" | "parziale" => Ok(Outcome::Partial),
            "unfilled" | "non_fillato" => Ok(Outcome::Unfilled),
            other => Err(JournalError::invalid(
                "outcome",
                format!(
                    "Unknown outcome '{other}'. Use: target, stop_loss, breakeven, partial, unfilled"
                ),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Boundary input
// ---------------------------------------------------------------------------

/// A trade as handed over by the storage layer, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInput {
    #[serde(default)]
    pub id: Option<String>,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub pair: String,
    pub direction: String,
    #[serde(default)]
    pub target: Option<Decimal>,
    #[serde(default)]
    pub stop_loss: Option<Decimal>,
    #[serde(alias = "result")]
    pub outcome: String,
    #[serde(default)]
    pub rr: Option<Decimal>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub confluences_pro: Option<Vec<String>>,
    #[serde(default, alias = "confluencesContro")]
    pub confluences_contra: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Validated record
// ---------------------------------------------------------------------------

/// A validated journal trade. Defaults are applied once, at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub pair: String,
    pub direction: Direction,
    /// Gain in return units if the target is fully hit
    pub target: Decimal,
    /// Loss magnitude in return units if the stop is fully hit
    pub stop_loss: Decimal,
    pub outcome: Outcome,
    pub rr: Option<Decimal>,
    pub emotion: String,
    pub confluences_pro: Vec<String>,
    pub confluences_contra: Vec<String>,
    pub notes: String,
    pub image_urls: Vec<String>,
}

impl TradeRecord {
    /// Validate a raw storage row into a record.
    pub fn from_input(input: &TradeInput) -> JournalResult<Self> {
        let date = parse_date(&input.date)?;
        let time = input.time.as_deref().and_then(parse_time);
        let direction: Direction = input.direction.parse()?;
        let outcome: Outcome = input.outcome.parse()?;
        let target = return_units("target", input.target.unwrap_or(Decimal::ZERO))?;
        let stop_loss = return_units("stop_loss", input.stop_loss.unwrap_or(Decimal::ZERO))?;
        let rr = input.rr.map(|v| return_units("rr", v)).transpose()?;

        Ok(TradeRecord {
            id: input.id.clone().unwrap_or_default(),
            date,
            time,
            pair: input.pair.trim().to_string(),
            direction,
            target,
            stop_loss,
            outcome,
            rr,
            emotion: input.emotion.clone().unwrap_or_default(),
            confluences_pro: input.confluences_pro.clone().unwrap_or_default(),
            confluences_contra: input.confluences_contra.clone().unwrap_or_default(),
            notes: input.notes.clone().unwrap_or_default(),
            image_urls: input.image_urls.clone().unwrap_or_default(),
        })
    }

    /// Time of day used for ordering; midnight when the time is absent.
    pub fn sort_time(&self) -> NaiveTime {
        self.time.unwrap_or_default()
    }
}

/// Validate a full batch, reporting the index of the first bad row.
pub fn validate_trades(inputs: &[TradeInput]) -> JournalResult<Vec<TradeRecord>> {
    validate_trades_with_warnings(inputs).map(|(records, _)| records)
}

/// Like [`validate_trades`], also returning one warning per trade whose time
/// could not be read. Those trades keep every other field and only drop out
/// of the hour-of-day buckets.
pub fn validate_trades_with_warnings(
    inputs: &[TradeInput],
) -> JournalResult<(Vec<TradeRecord>, Vec<String>)> {
    let mut warnings = Vec::new();
    let mut records = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.iter().enumerate() {
        let record = TradeRecord::from_input(input).map_err(|e| match e {
            JournalError::InvalidInput { field, reason } => JournalError::InvalidInput {
                field: format!("trades[{i}].{field}"),
                reason,
            },
            other => other,
        })?;
        if let Some(raw) = unreadable_time(input, &record) {
            tracing::warn!(index = i, time = raw, "unparsable trade time ignored");
            warnings.push(format!(
                "trades[{i}].time: '{raw}' is not an HH:MM time; trade left out of hour buckets"
            ));
        }
        records.push(record);
    }
    tracing::debug!(count = records.len(), "validated trade batch");
    Ok((records, warnings))
}

fn unreadable_time<'a>(input: &'a TradeInput, record: &TradeRecord) -> Option<&'a str> {
    let raw = input.time.as_deref()?.trim();
    (!raw.is_empty() && record.time.is_none()).then_some(raw)
}

fn parse_date(raw: &str) -> JournalResult<NaiveDate> {
    let trimmed = raw.trim();
    // Storage occasionally hands over full timestamps; only the date part matters.
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| {
        JournalError::invalid("date", format!("'{raw}' is not a YYYY-MM-DD date"))
    })
}

/// `HH:MM` or `HH:MM:SS`; blank or unreadable times are absent.
fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Largest accepted target, stop or rr, in return units. Together with
/// [`RETURN_UNITS_DP`] this keeps every sum and ratio over a journal well
/// inside `Decimal` range.
pub const MAX_RETURN_UNITS: Decimal = dec!(1000000000);
/// Decimal places kept for target, stop and rr.
pub const RETURN_UNITS_DP: u32 = 8;

fn return_units(field: &str, value: Decimal) -> JournalResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(JournalError::invalid(
            field,
            format!("{field} must be non-negative, got {value}"),
        ));
    }
    if value > MAX_RETURN_UNITS {
        return Err(JournalError::invalid(
            field,
            format!("{field} must not exceed {MAX_RETURN_UNITS}, got {value}"),
        ));
    }
    Ok(value.round_dp(RETURN_UNITS_DP))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
