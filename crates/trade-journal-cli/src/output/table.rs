use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, is_record_list, payload};

/// Format output as tables using the tabled crate. Scalar result fields go
/// into one Field/Value table; every list of records gets its own table.
pub fn print_table(value: &Value) {
    match payload(value) {
        Value::Object(result) => print_result_object(result),
        Value::Array(arr) => print_records(arr),
        other => println!("{}", cell(other)),
    }

    if let Value::Object(envelope) = value {
        print_notes(envelope);
    }
}

fn print_result_object(result: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections: Vec<(&str, &Value)> = Vec::new();
    for (key, val) in result {
        match val {
            Value::Object(inner) if inner.values().all(|v| !v.is_object() && !v.is_array()) => {
                for (k, v) in inner {
                    builder.push_record([format!("{key}.{k}"), cell(v)]);
                }
            }
            v if is_record_list(v) || v.is_object() => sections.push((key.as_str(), v)),
            v => builder.push_record([key.clone(), cell(v)]),
        }
    }
    println!("{}", Table::from(builder));

    for (title, section) in sections {
        println!("\n{}:", title);
        match section {
            Value::Array(arr) => print_records(arr),
            Value::Object(map) => print_result_object(map),
            _ => {}
        }
    }
}

fn print_records(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());
        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(cell).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", cell(item));
        }
    }
}

fn print_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
