use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

use super::scalar_text;

/// Decimal places shown for numeric cells; JSON and CSV keep full precision.
const TABLE_DP: u32 = 4;

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Array(rows) => print_rows(rows),
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                print_fields(result);
                print_envelope_notes(map);
            }
            _ => print_fields(map),
        },
        other => println!("{}", cell_text(other)),
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), cell_text(val)]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        if rows.is_empty() {
            println!("(empty)");
        }
        for row in rows {
            println!("{}", cell_text(row));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        if let Value::Object(map) = row {
            builder.push_record(
                headers
                    .iter()
                    .map(|h| map.get(h).map(cell_text).unwrap_or_default()),
            );
        }
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
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

/// Decimal strings are trimmed to [`TABLE_DP`] places for readability.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => match s.parse::<Decimal>() {
            Ok(d) if d.scale() > TABLE_DP => d.round_dp(TABLE_DP).to_string(),
            _ => s.clone(),
        },
        Value::Null => "null".to_string(),
        other => scalar_text(other),
    }
}
