use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use loan_calc_core::amortization::{self, LoanInputs};
use loan_calc_core::currency::{self, CurrencyEntry, RateSource, RateTable, StaticRateSource};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Bare schedule without the envelope. Inputs are still validated: an
/// unchecked term would size the schedule allocation.
#[napi]
pub fn compute_amortization(input_json: String) -> NapiResult<String> {
    let input: LoanInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    amortization::validate_inputs(&input).map_err(to_napi_error)?;
    let output = amortization::compute_amortization(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Validated schedule wrapped in the output envelope.
#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    let input: LoanInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ConvertRequest {
    amount: Decimal,
    rates: RateTable,
    target: String,
}

#[derive(Deserialize)]
struct ListRequest {
    rates: RateTable,
    #[serde(default)]
    names: HashMap<String, String>,
}

#[derive(Deserialize)]
struct SearchRequest {
    currencies: Vec<CurrencyEntry>,
    term: String,
}

#[napi]
pub fn convert_amount(input_json: String) -> NapiResult<String> {
    let req: ConvertRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let converted = currency::convert(req.amount, &req.rates, &req.target);
    serde_json::to_string(&converted).map_err(to_napi_error)
}

#[napi]
pub fn list_currencies(input_json: String) -> NapiResult<String> {
    let req: ListRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let entries = currency::list_currencies(&req.rates, &req.names);
    serde_json::to_string(&entries).map_err(to_napi_error)
}

#[napi]
pub fn search_currencies(input_json: String) -> NapiResult<String> {
    let req: SearchRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let hits = currency::search_currencies(&req.currencies, &req.term);
    serde_json::to_string(&hits).map_err(to_napi_error)
}

/// The built-in rate snapshot, optionally rebased onto another currency.
#[napi]
pub fn mock_rates(base: Option<String>) -> NapiResult<String> {
    let mut snapshot = StaticRateSource::mock().fetch_rates().map_err(to_napi_error)?;
    if let Some(base) = base {
        snapshot = snapshot.rebase(&base).map_err(to_napi_error)?;
    }
    serde_json::to_string(&snapshot).map_err(to_napi_error)
}

/// `amount` is a decimal string so no precision is lost crossing into JS.
#[napi]
pub fn format_money(amount: String, code: String) -> NapiResult<String> {
    let amount: Decimal = amount.trim().parse().map_err(to_napi_error)?;
    Ok(currency::format_money(amount, &code))
}
