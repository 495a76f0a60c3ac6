use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::rates::RateTable;
use crate::types::Money;

#[cfg(feature = "amortization")]
use crate::amortization::{AmortizationResult, AmortizationRow};

/// One currency as shown in a selector or rate listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyEntry {
    pub code: String,
    pub display_name: String,
    pub rate: Decimal,
}

/// Scale `amount` into `target_code`.
///
/// A code missing from the table means "no conversion": the amount comes back
/// unchanged. No rounding is applied here.
pub fn convert(amount: Money, rates: &RateTable, target_code: &str) -> Money {
    match rates.get(target_code) {
        Some(rate) => amount.saturating_mul(rate),
        None => amount,
    }
}

/// Project every table entry into a [`CurrencyEntry`], in table order.
/// Codes without a known name use the code itself.
pub fn list_currencies(rates: &RateTable, names: &HashMap<String, String>) -> Vec<CurrencyEntry> {
    rates
        .iter()
        .map(|(code, rate)| CurrencyEntry {
            code: code.to_string(),
            display_name: names.get(code).cloned().unwrap_or_else(|| code.to_string()),
            rate,
        })
        .collect()
}

/// Case-insensitive substring match on code or display name.
pub fn search_currencies(entries: &[CurrencyEntry], term: &str) -> Vec<CurrencyEntry> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|e| {
            e.code.to_lowercase().contains(&needle)
                || e.display_name.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Every monetary figure of an amortization result, converted for display.
#[cfg(feature = "amortization")]
pub fn convert_amortization(
    result: &AmortizationResult,
    rates: &RateTable,
    target_code: &str,
) -> AmortizationResult {
    let fx = |amount: Money| convert(amount, rates, target_code);
    AmortizationResult {
        periodic_payment: fx(result.periodic_payment),
        total_payment: fx(result.total_payment),
        total_interest: fx(result.total_interest),
        schedule: result
            .schedule
            .iter()
            .map(|row| AmortizationRow {
                period: row.period,
                beginning_balance: fx(row.beginning_balance),
                payment: fx(row.payment),
                principal_component: fx(row.principal_component),
                interest_component: fx(row.interest_component),
                ending_balance: fx(row.ending_balance),
                cumulative_interest: fx(row.cumulative_interest),
            })
            .collect(),
        payment_fallback: result.payment_fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn table() -> RateTable {
        [("USD", dec!(1)), ("EUR", dec!(0.91)), ("JPY", dec!(149.75))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_convert_known_code() {
        assert_eq!(convert(dec!(100), &table(), "EUR"), dec!(91));
        assert_eq!(convert(dec!(2), &table(), "JPY"), dec!(299.5));
    }

    #[test]
    fn test_convert_missing_code_is_identity() {
        assert_eq!(convert(dec!(123.45), &table(), "CHF"), dec!(123.45));
        assert_eq!(convert(dec!(123.45), &RateTable::new(), "EUR"), dec!(123.45));
    }

    #[test]
    fn test_convert_is_case_sensitive() {
        assert_eq!(convert(dec!(100), &table(), "eur"), dec!(100));
    }

    #[test]
    fn test_list_currencies_falls_back_to_code() {
        let mut names = HashMap::new();
        names.insert("EUR".to_string(), "Euro".to_string());

        let entries = list_currencies(&table(), &names);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].code, "USD");
        assert_eq!(entries[0].display_name, "USD");
        assert_eq!(entries[1].display_name, "Euro");
        assert_eq!(entries[2].rate, dec!(149.75));
    }

    #[test]
    fn test_search_matches_code_and_name() {
        let mut names = HashMap::new();
        names.insert("USD".to_string(), "US Dollar".to_string());
        names.insert("EUR".to_string(), "Euro".to_string());
        names.insert("JPY".to_string(), "Japanese Yen".to_string());
        let entries = list_currencies(&table(), &names);

        let hits = search_currencies(&entries, "eu");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "EUR");

        let hits = search_currencies(&entries, "YEN");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "JPY");

        assert_eq!(search_currencies(&entries, "  ").len(), 3);
        assert!(search_currencies(&entries, "franc").is_empty());
    }
}
