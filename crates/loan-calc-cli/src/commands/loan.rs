use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use loan_calc_core::amortization::{self, LoanInputs};
use loan_calc_core::currency::{convert, convert_amortization, format_money, RateSnapshot};
use loan_calc_core::types::Money;

use crate::commands::load_rates;
use crate::input;

/// Arguments shared by the loan summary and schedule commands
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 5 for 5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in monthly periods
    #[arg(long)]
    pub term: Option<u32>,

    /// Display currency code (defaults to the rate table's base)
    #[arg(long)]
    pub currency: Option<String>,

    /// Path to a JSON rate snapshot (defaults to the built-in table)
    #[arg(long)]
    pub rates: Option<String>,
}

/// Headline figures of a loan in the display currency
#[derive(Debug, Serialize)]
pub struct LoanSummary {
    pub currency: String,
    pub principal: Money,
    pub periodic_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub term_periods: u32,
    pub payment_fallback: bool,
    pub periodic_payment_display: String,
    pub principal_display: String,
    pub total_payment_display: String,
    pub total_interest_display: String,
}

/// Flags win over stdin; missing flags take the calculator defaults.
fn resolve_inputs(args: &LoanArgs) -> Result<LoanInputs, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }

    let has_flags = args.principal.is_some() || args.rate.is_some() || args.term.is_some();
    if !has_flags {
        if let Some(inputs) = input::stdin::read_stdin::<LoanInputs>()? {
            return Ok(inputs);
        }
    }

    let defaults = LoanInputs::default();
    Ok(LoanInputs {
        principal: args.principal.unwrap_or(defaults.principal),
        annual_rate_percent: args.rate.unwrap_or(defaults.annual_rate_percent),
        term_periods: args.term.unwrap_or(defaults.term_periods),
    })
}

fn display_currency(requested: Option<&str>, snapshot: &RateSnapshot) -> String {
    let code = requested
        .map(|c| c.trim().to_uppercase())
        .unwrap_or_else(|| snapshot.base.clone());
    if !snapshot.rates.contains(&code) {
        tracing::warn!(currency = %code, "no rate for currency; amounts shown unconverted");
    }
    code
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = resolve_inputs(&args)?;
    let output = amortization::calculate_loan(&inputs)?;

    let snapshot = load_rates(args.rates.as_deref())?;
    let currency = display_currency(args.currency.as_deref(), &snapshot);
    let principal = convert(inputs.principal, &snapshot.rates, &currency);

    let summary = output.map_result(|result| {
        let shown = convert_amortization(&result, &snapshot.rates, &currency);
        LoanSummary {
            principal,
            periodic_payment: shown.periodic_payment,
            total_payment: shown.total_payment,
            total_interest: shown.total_interest,
            term_periods: inputs.term_periods,
            payment_fallback: shown.payment_fallback,
            periodic_payment_display: format_money(shown.periodic_payment, &currency),
            principal_display: format_money(principal, &currency),
            total_payment_display: format_money(shown.total_payment, &currency),
            total_interest_display: format_money(shown.total_interest, &currency),
            currency: currency.clone(),
        }
    });

    Ok(serde_json::to_value(summary)?)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = resolve_inputs(&args)?;
    let output = amortization::calculate_loan(&inputs)?;

    for warning in &output.warnings {
        tracing::warn!("{}", warning);
    }

    let snapshot = load_rates(args.rates.as_deref())?;
    let currency = display_currency(args.currency.as_deref(), &snapshot);

    let shown = convert_amortization(&output.result, &snapshot.rates, &currency);
    Ok(serde_json::to_value(shown.schedule)?)
}
