use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use loan_calc_core::currency::{RateSnapshot, RateSource};
use loan_calc_core::{LoanCalcError, LoanCalcResult};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Exchange rates loaded from a JSON snapshot on disk:
/// `{"base": "USD", "rates": {"USD": 1, "EUR": 0.91}, "names": {"EUR": "Euro"}}`
pub struct JsonRateSource {
    path: String,
}

impl JsonRateSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl RateSource for JsonRateSource {
    fn fetch_rates(&self) -> LoanCalcResult<RateSnapshot> {
        let contents = resolve_path(&self.path)
            .and_then(|canonical| Ok(fs::read_to_string(canonical)?))
            .map_err(|e| LoanCalcError::InvalidInput {
                field: "rates".into(),
                reason: format!("Failed to read '{}': {}", self.path, e),
            })?;
        let snapshot: RateSnapshot = serde_json::from_str(&contents)?;
        snapshot.rates.validate()?;
        tracing::debug!(
            path = %self.path,
            base = %snapshot.base,
            currencies = snapshot.rates.len(),
            "loaded rate snapshot"
        );
        Ok(snapshot)
    }
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn write_temp(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("loancalc-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_rate_file_loads_in_order() {
        let path = write_temp(
            "rates-ok.json",
            r#"{"base": "EUR", "rates": {"EUR": 1, "CHF": "0.96"}, "names": {"CHF": "Swiss Franc"}}"#,
        );
        let snapshot = JsonRateSource::new(&path).fetch_rates().unwrap();
        assert_eq!(snapshot.base, "EUR");
        assert_eq!(snapshot.rates.codes().collect::<Vec<_>>(), vec!["EUR", "CHF"]);
        assert_eq!(snapshot.rates.get("CHF"), Some(Decimal::new(96, 2)));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_malformed_rate_file_is_serialization_error() {
        let path = write_temp("rates-bad.json", r#"{"base": "USD", "rates": [1, 2]}"#);
        let err = JsonRateSource::new(&path).fetch_rates().unwrap_err();
        assert!(matches!(err, LoanCalcError::SerializationError(_)), "got {err}");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_rate_file_is_invalid_input() {
        let err = JsonRateSource::new("/nonexistent/loancalc-rates.json")
            .fetch_rates()
            .unwrap_err();
        assert!(matches!(err, LoanCalcError::InvalidInput { ref field, .. } if field == "rates"));
    }
}
