use serde_json::{Map, Value};
use std::io::Write;

use super::scalar_text;

/// Write output as CSV.
///
/// Arrays of objects (schedules, currency listings) become one row per item;
/// an envelope's `result` object becomes `field,value` pairs.
pub fn write_csv<W: Write>(out: W, value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(out);

    match value {
        Value::Array(rows) => write_rows(&mut wtr, rows)?,
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => write_fields(&mut wtr, result)?,
            _ => write_fields(&mut wtr, map)?,
        },
        other => wtr.write_record([scalar_text(other)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_fields<W: Write>(
    wtr: &mut csv::Writer<W>,
    map: &Map<String, Value>,
) -> Result<(), Box<dyn std::error::Error>> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &scalar_text(val)])?;
    }
    Ok(())
}

fn write_rows<W: Write>(
    wtr: &mut csv::Writer<W>,
    rows: &[Value],
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            wtr.write_record([scalar_text(row)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(scalar_text).unwrap_or_default())
                .collect();
            wtr.write_record(&record)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_schedule_rows() {
        let rows = json!([
            {"period": 1, "payment": "100.5"},
            {"period": 2, "payment": "100.5"}
        ]);
        assert_eq!(render(&rows), "period,payment\n1,100.5\n2,100.5\n");
    }

    #[test]
    fn test_envelope_result_fields() {
        let envelope = json!({
            "result": {"currency": "EUR", "payment_fallback": false},
            "warnings": []
        });
        assert_eq!(
            render(&envelope),
            "field,value\ncurrency,EUR\npayment_fallback,false\n"
        );
    }
}
