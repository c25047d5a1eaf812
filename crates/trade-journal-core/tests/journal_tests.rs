use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use trade_journal_core::analytics::equity::{equity_curve, max_drawdown};
use trade_journal_core::analytics::risk_of_ruin::estimate_risk_of_ruin;
use trade_journal_core::analytics::streaks::{detect_streaks, StreakKind};
use trade_journal_core::analytics::summary::performance_summary;
use trade_journal_core::analytics::temporal::{
    monthly_breakdown, performance_by_hour, performance_by_weekday,
};
use trade_journal_core::analytics::{analyze_journal, JournalInput};
use trade_journal_core::export::{parse_csv, to_csv_string};
use trade_journal_core::trade::validate_trades;
use trade_journal_core::{AnalyticsConfig, JournalError, TradeInput, TradeRecord};

// ===========================================================================
// Journal-level scenarios exercised through the public API, starting from
// raw storage rows.
// ===========================================================================

fn row(date: &str, time: Option<&str>, outcome: &str, target: Decimal, stop: Decimal) -> TradeInput {
    TradeInput {
        date: date.into(),
        time: time.map(String::from),
        pair: "EURUSD".into(),
        direction: "long".into(),
        target: Some(target),
        stop_loss: Some(stop),
        outcome: outcome.into(),
        ..Default::default()
    }
}

fn three_trades() -> Vec<TradeRecord> {
    validate_trades(&[
        row("2025-01-06", Some("10:00"), "target", dec!(2), dec!(1)),
        row("2025-01-07", Some("10:00"), "stop_loss", dec!(2), dec!(1)),
        row("2025-01-08", Some("10:00"), "partial", dec!(2), dec!(1)),
    ])
    .unwrap()
}

// ---------------------------------------------------------------------------
// Three-trade scenario
// ---------------------------------------------------------------------------

#[test]
fn test_three_trade_equity_and_win_rate() {
    let trades = three_trades();
    let config = AnalyticsConfig::default();

    let curve = equity_curve(&trades, config.starting_capital, config.pnl_scale);
    let labels: Vec<&str> = curve.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Start", "2025-01-06", "2025-01-07", "2025-01-08"]);
    assert_eq!(curve.last().map(|p| p.equity), Some(dec!(10200)));

    let summary = performance_summary(&trades, &config);
    assert_eq!(summary.wins, 2);
    assert_eq!(summary.losses, 1);
    assert_eq!(summary.win_rate, dec!(2) / dec!(3));
}

#[test]
fn test_three_trade_streaks() {
    let streaks = detect_streaks(&three_trades());
    assert_eq!(streaks.max_win_streak, 1);
    assert_eq!(streaks.max_loss_streak, 1);
    assert_eq!(streaks.current_streak, 1);
    assert_eq!(streaks.current_streak_kind, StreakKind::Win);
}

// ---------------------------------------------------------------------------
// Empty scenario
// ---------------------------------------------------------------------------

#[test]
fn test_empty_journal_is_total() {
    let config = AnalyticsConfig::default();
    let curve = equity_curve(&[], config.starting_capital, config.pnl_scale);
    assert_eq!(curve.len(), 1);
    assert_eq!(curve[0].label, "Start");
    assert_eq!(curve[0].equity, dec!(10000));

    let dd = max_drawdown(&[], config.pnl_scale);
    assert_eq!(dd.max_drawdown, Decimal::ZERO);
    assert_eq!(dd.max_drawdown_pct, Decimal::ZERO);

    assert!(performance_by_weekday(&[]).iter().all(|b| b.win_rate.is_zero()));

    let ruin = estimate_risk_of_ruin(&[], &config.risk_levels).unwrap();
    assert!(ruin.levels.iter().all(|l| l.risk_of_ruin_pct == dec!(100)));
}

// ---------------------------------------------------------------------------
// Boundary validation
// ---------------------------------------------------------------------------

#[test]
fn test_unparsable_time_keeps_trade() {
    let trades = validate_trades(&[
        row("2025-01-06", Some("25:99"), "target", dec!(1), dec!(1)),
        row("2025-01-07", Some("11:00"), "target", dec!(1), dec!(1)),
    ])
    .unwrap();
    assert_eq!(trades[0].time, None);

    let config = AnalyticsConfig::default();
    let curve = equity_curve(&trades, config.starting_capital, config.pnl_scale);
    assert_eq!(curve.last().map(|p| p.equity), Some(dec!(10200)));
    let by_weekday: u32 = performance_by_weekday(&trades).iter().map(|b| b.trades).sum();
    assert_eq!(by_weekday, 2);
    let by_hour: u32 = performance_by_hour(&trades, config.hour_range)
        .iter()
        .map(|b| b.stats.trades)
        .sum();
    assert_eq!(by_hour, 1);
    assert_eq!(monthly_breakdown(&trades, &config)[0].trades, 2);
}

#[test]
fn test_negative_stop_rejected() {
    let err = validate_trades(&[row("2025-01-06", None, "target", dec!(1), dec!(-1))])
        .unwrap_err();
    match err {
        JournalError::InvalidInput { field, .. } => assert_eq!(field, "trades[0].stop_loss"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Month equity carry
// ---------------------------------------------------------------------------

#[test]
fn test_month_equity_matches_curve_at_month_end() {
    let trades = validate_trades(&[
        row("2025-01-10", None, "target", dec!(3), dec!(1)),
        row("2025-02-03", None, "stop_loss", dec!(3), dec!(1)),
        row("2025-02-20", None, "partial", dec!(1), dec!(1)),
        row("2025-03-01", None, "breakeven", dec!(1), dec!(1)),
    ])
    .unwrap();
    let config = AnalyticsConfig::default();
    let months = monthly_breakdown(&trades, &config);
    let curve = equity_curve(&trades, config.starting_capital, config.pnl_scale);
    let month_end: Vec<Decimal> = months.iter().map(|m| m.equity).collect();
    assert_eq!(month_end, vec![curve[1].equity, curve[3].equity, curve[4].equity]);
}

// ---------------------------------------------------------------------------
// Report and export together
// ---------------------------------------------------------------------------

#[test]
fn test_report_serializes_to_json() {
    let input = JournalInput {
        trades: vec![
            row("2025-01-06", Some("10:00"), "target", dec!(2), dec!(1)),
            row("2025-01-07", None, "non_fillato", dec!(2), dec!(1)),
        ],
        ..Default::default()
    };
    let out = analyze_journal(&input).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["summary"]["total_trades"], 2);
    assert_eq!(json["result"]["summary"]["unfilled"], 1);
    assert_eq!(json["metadata"]["precision"], "rust_decimal_128bit");
}

#[test]
fn test_csv_export_recovers_every_string_field() {
    let mut inputs = vec![row("2025-01-06", Some("08:15"), "target", dec!(2), dec!(1))];
    inputs[0].notes = Some("News spike, \"fakeout\", then run".into());
    inputs[0].emotion = Some("confident".into());
    inputs[0].confluences_contra = Some(vec!["Asia high".into(), "DXY".into()]);
    let trades = validate_trades(&inputs).unwrap();

    let text = to_csv_string(&trades, dec!(100)).unwrap();
    let rows = parse_csv(text.as_bytes()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2025-01-06");
    assert_eq!(rows[0].time, "08:15");
    assert_eq!(rows[0].pair, "EURUSD");
    assert_eq!(rows[0].direction, "Long");
    assert_eq!(rows[0].pnl, "200.00");
    assert_eq!(rows[0].emotion, "confident");
    assert_eq!(rows[0].confluences_contra, "Asia high; DXY");
    assert_eq!(rows[0].notes, "News spike, \"fakeout\", then run");
}
