use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use loan_calc_core::currency::{
    convert, format_money, format_rate, list_currencies, search_currencies,
};
use loan_calc_core::types::Money;

use crate::commands::load_rates;

/// Arguments for converting a single amount
#[derive(Args)]
pub struct ConvertArgs {
    /// Amount in the rate table's base currency
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Decimal,

    /// Target currency code
    #[arg(long)]
    pub to: String,

    /// Path to a JSON rate snapshot (defaults to the built-in table)
    #[arg(long)]
    pub rates: Option<String>,
}

/// Arguments for listing available currencies
#[derive(Args)]
pub struct CurrenciesArgs {
    /// Filter by code or name (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Express rates against this currency instead of the table's base
    #[arg(long)]
    pub base: Option<String>,

    /// Path to a JSON rate snapshot (defaults to the built-in table)
    #[arg(long)]
    pub rates: Option<String>,
}

#[derive(Debug, Serialize)]
struct ConversionOutput {
    amount: Money,
    base: String,
    currency: String,
    rate: Option<Decimal>,
    converted: Money,
    converted_display: String,
}

#[derive(Debug, Serialize)]
struct CurrencyRow {
    code: String,
    display_name: String,
    rate: Decimal,
    rate_display: String,
}

pub fn run_convert(args: ConvertArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = load_rates(args.rates.as_deref())?;
    let currency = args.to.trim().to_uppercase();
    let rate = snapshot.rates.get(&currency);
    if rate.is_none() {
        tracing::warn!(currency = %currency, "no rate for currency; amount returned unconverted");
    }

    let converted = convert(args.amount, &snapshot.rates, &currency);
    let output = ConversionOutput {
        amount: args.amount,
        base: snapshot.base,
        converted_display: format_money(converted, &currency),
        currency,
        rate,
        converted,
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_currencies(args: CurrenciesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut snapshot = load_rates(args.rates.as_deref())?;
    if let Some(base) = args.base {
        snapshot = snapshot.rebase(&base.trim().to_uppercase())?;
    }

    let entries = list_currencies(&snapshot.rates, &snapshot.names);
    let entries = match args.search {
        Some(ref term) => search_currencies(&entries, term),
        None => entries,
    };

    let rows: Vec<CurrencyRow> = entries
        .into_iter()
        .map(|e| CurrencyRow {
            rate_display: format_rate(e.rate),
            code: e.code,
            display_name: e.display_name,
            rate: e.rate,
        })
        .collect();
    Ok(serde_json::to_value(rows)?)
}
