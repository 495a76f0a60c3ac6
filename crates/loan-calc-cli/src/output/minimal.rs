use serde_json::Value;

use super::scalar_text;

/// Headline fields, in priority order, for each command's result.
const PRIORITY_KEYS: [&str; 4] = [
    "periodic_payment_display",
    "converted_display",
    "periodic_payment",
    "converted",
];

/// Print just the key answer value from the output.
///
/// Schedules and listings print one line per row, keyed by their first field.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    println!("{}", headline(result));
}

fn headline(result: &Value) -> String {
    match result {
        Value::Object(map) => PRIORITY_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|v| !v.is_null())
            .map(scalar_text)
            .or_else(|| {
                map.iter()
                    .next()
                    .map(|(key, val)| format!("{}: {}", key, scalar_text(val)))
            })
            .unwrap_or_default(),
        Value::Array(rows) => rows.iter().map(headline).collect::<Vec<_>>().join("\n"),
        other => scalar_text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loan_headline_prefers_display_payment() {
        let out = json!({"result": {"currency": "USD", "periodic_payment": "8560.75", "periodic_payment_display": "$8,560.75"}});
        let result = out.get("result").unwrap();
        assert_eq!(headline(result), "$8,560.75");
    }

    #[test]
    fn test_rows_fall_back_to_first_field() {
        let rows = json!([{"code": "USD"}, {"code": "EUR"}]);
        assert_eq!(headline(&rows), "code: USD\ncode: EUR");
    }
}
