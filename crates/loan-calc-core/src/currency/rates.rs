use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::error::LoanCalcError;
use crate::LoanCalcResult;

/// Units of each currency per one unit of the table's base currency.
///
/// Entries keep insertion order, so a table read from JSON lists currencies
/// in the order the source wrote them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateTable {
    entries: Vec<(String, Decimal)>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a rate. A replaced entry keeps its position.
    pub fn insert(&mut self, code: impl Into<String>, rate: Decimal) -> Option<Decimal> {
        let code = code.into();
        match self.entries.iter_mut().find(|(c, _)| *c == code) {
            Some((_, existing)) => Some(std::mem::replace(existing, rate)),
            None => {
                self.entries.push((code, rate));
                None
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, rate)| *rate)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.entries.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(code, _)| code.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every code must be non-empty and every rate strictly positive.
    pub fn validate(&self) -> LoanCalcResult<()> {
        for (code, rate) in &self.entries {
            if code.trim().is_empty() {
                return Err(LoanCalcError::InvalidInput {
                    field: "rates".into(),
                    reason: "Currency code cannot be empty".into(),
                });
            }
            if *rate <= Decimal::ZERO {
                return Err(LoanCalcError::InvalidInput {
                    field: format!("rates.{code}"),
                    reason: "Exchange rate must be positive".into(),
                });
            }
        }
        Ok(())
    }

    /// Re-express every rate per one unit of `new_base`.
    pub fn rebase(&self, new_base: &str) -> LoanCalcResult<RateTable> {
        let base_rate = self
            .get(new_base)
            .ok_or_else(|| LoanCalcError::UnknownCurrency(new_base.to_string()))?;

        let mut rebased = RateTable::new();
        for (code, rate) in self.iter() {
            let relative = rate
                .checked_div(base_rate)
                .ok_or_else(|| LoanCalcError::DivisionByZero {
                    context: format!("rebasing {code} onto {new_base}"),
                })?;
            rebased.insert(code, relative);
        }
        Ok(rebased)
    }
}

impl<S: Into<String>> FromIterator<(S, Decimal)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (S, Decimal)>>(iter: I) -> Self {
        let mut table = RateTable::new();
        for (code, rate) in iter {
            table.insert(code, rate);
        }
        table
    }
}

impl Serialize for RateTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, rate) in &self.entries {
            map.serialize_entry(code, rate)?;
        }
        map.end()
    }
}

struct RateTableVisitor;

impl<'de> Visitor<'de> for RateTableVisitor {
    type Value = RateTable;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of currency code to exchange rate")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RateTable, A::Error> {
        let mut table = RateTable::new();
        while let Some((code, rate)) = access.next_entry::<String, Decimal>()? {
            table.insert(code, rate);
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for RateTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RateTableVisitor)
    }
}

/// A rate table together with its base currency and display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub base: String,
    pub rates: RateTable,
    #[serde(default)]
    pub names: HashMap<String, String>,
}

impl RateSnapshot {
    /// The same snapshot expressed against another base currency.
    pub fn rebase(&self, new_base: &str) -> LoanCalcResult<RateSnapshot> {
        Ok(RateSnapshot {
            base: new_base.to_string(),
            rates: self.rates.rebase(new_base)?,
            names: self.names.clone(),
        })
    }
}

/// Where exchange rates come from. Implementations may be static, cached or
/// backed by a remote feed; the calculator only sees the returned snapshot.
pub trait RateSource {
    fn fetch_rates(&self) -> LoanCalcResult<RateSnapshot>;
}

/// A fixed, in-memory rate source.
#[derive(Debug, Clone)]
pub struct StaticRateSource {
    snapshot: RateSnapshot,
}

impl StaticRateSource {
    pub fn new(snapshot: RateSnapshot) -> Self {
        Self { snapshot }
    }

    /// Built-in demonstration rates against USD.
    pub fn mock() -> Self {
        let listing = [
            ("USD", dec!(1), "US Dollar"),
            ("EUR", dec!(0.91), "Euro"),
            ("GBP", dec!(0.77), "British Pound"),
            ("JPY", dec!(149.75), "Japanese Yen"),
            ("CAD", dec!(1.35), "Canadian Dollar"),
            ("AUD", dec!(1.51), "Australian Dollar"),
            ("INR", dec!(83.24), "Indian Rupee"),
            ("CNY", dec!(7.19), "Chinese Yuan"),
        ];

        Self::new(RateSnapshot {
            base: "USD".into(),
            rates: listing.iter().map(|(code, rate, _)| (*code, *rate)).collect(),
            names: listing
                .iter()
                .map(|(code, _, name)| (code.to_string(), name.to_string()))
                .collect(),
        })
    }
}

impl RateSource for StaticRateSource {
    fn fetch_rates(&self) -> LoanCalcResult<RateSnapshot> {
        self.snapshot.rates.validate()?;
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> RateTable {
        [("USD", dec!(1)), ("EUR", dec!(0.8)), ("JPY", dec!(150))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_insert_keeps_position_on_replace() {
        let mut table = sample();
        let previous = table.insert("EUR", dec!(0.9));
        assert_eq!(previous, Some(dec!(0.8)));
        let codes: Vec<&str> = table.codes().collect();
        assert_eq!(codes, vec!["USD", "EUR", "JPY"]);
        assert_eq!(table.get("EUR"), Some(dec!(0.9)));
    }

    #[test]
    fn test_rebase_onto_eur() {
        let rebased = sample().rebase("EUR").unwrap();
        assert_eq!(rebased.get("EUR"), Some(Decimal::ONE));
        assert_eq!(rebased.get("USD"), Some(dec!(1.25)));
        assert_eq!(rebased.get("JPY"), Some(dec!(187.5)));
    }

    #[test]
    fn test_rebase_unknown_base() {
        let err = sample().rebase("CHF").unwrap_err();
        assert!(matches!(err, LoanCalcError::UnknownCurrency(code) if code == "CHF"));
    }

    #[test]
    fn test_validate_rejects_non_positive_rate() {
        let mut table = sample();
        table.insert("XXX", Decimal::ZERO);
        assert!(table.validate().is_err());
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_json_preserves_order() {
        let table: RateTable =
            serde_json::from_str(r#"{"GBP": 0.77, "USD": 1, "AUD": "1.51"}"#).unwrap();
        let codes: Vec<&str> = table.codes().collect();
        assert_eq!(codes, vec!["GBP", "USD", "AUD"]);
        assert_eq!(table.get("AUD"), Some(dec!(1.51)));
    }

    #[test]
    fn test_mock_source() {
        let snapshot = StaticRateSource::mock().fetch_rates().unwrap();
        assert_eq!(snapshot.base, "USD");
        assert_eq!(snapshot.rates.len(), 8);
        assert_eq!(snapshot.rates.get("EUR"), Some(dec!(0.91)));
        assert_eq!(snapshot.names.get("INR").map(String::as_str), Some("Indian Rupee"));
    }
}
