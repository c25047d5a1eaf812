use serde_json::Value;

use super::{cell, payload};

/// Headline fields, most specific first.
const PRIORITY_KEYS: [&str; 10] = [
    "final_equity",
    "risk_of_ruin_pct",
    "max_drawdown_pct",
    "profit_progress_pct",
    "projected_growth_pct",
    "current_streak",
    "win_rate",
    "expectancy",
    "rows",
    "total_trades",
];

/// Print just the key answer value from the output.
///
/// Looks for a headline field in the result, then in its `summary` section,
/// and falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result = payload(value);

    if let Value::Object(map) = result {
        let summary = map.get("summary").and_then(Value::as_object);
        for key in PRIORITY_KEYS {
            let hit = map
                .get(key)
                .or_else(|| summary.and_then(|s| s.get(key)))
                .filter(|v| !v.is_null());
            if let Some(val) = hit {
                println!("{}", cell(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, cell(val));
            return;
        }
    }

    if let Value::Array(arr) = result {
        println!("{}", arr.len());
        return;
    }

    println!("{}", cell(result));
}
