use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::emi::{periodic_payment, periodic_rate, LoanInputs, PaymentCalc};
use crate::error::LoanCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::LoanCalcResult;

/// Hard ceiling on the schedule length (100 years of monthly installments).
pub const MAX_TERM_PERIODS: u32 = 1200;

/// Longest term a consumer loan normally runs (30 years).
pub const MAX_TYPICAL_TERM_PERIODS: u32 = 360;

/// Annual rate above which the inputs are flagged as unusual.
pub const MAX_TYPICAL_RATE_PERCENT: Percent = dec!(20);

/// A single period in the repayment schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub beginning_balance: Money,
    pub payment: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    pub ending_balance: Money,
    pub cumulative_interest: Money,
}

/// Installment, totals and the full period-by-period breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub periodic_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub schedule: Vec<AmortizationRow>,
    /// Set when the installment could not be represented and was reported as zero.
    pub payment_fallback: bool,
}

/// Derive the installment and walk it across every period.
///
/// Assumes validated input; see [`calculate_loan`] for the checked entry
/// point. The last row's ending balance is left exactly as computed, so it may
/// differ from zero by rounding in the final decimal places.
pub fn compute_amortization(inputs: &LoanInputs) -> AmortizationResult {
    let rate = periodic_rate(inputs.annual_rate_percent);
    let PaymentCalc { payment, fallback } =
        periodic_payment(inputs.principal, rate, inputs.term_periods);

    let mut schedule = Vec::with_capacity(inputs.term_periods as usize);
    let mut balance = inputs.principal;
    let mut cumulative_interest = Decimal::ZERO;

    // Saturating ops keep a fallback schedule (zero payment, compounding
    // balance) inside the Decimal range instead of panicking.
    for period in 1..=inputs.term_periods {
        let interest = balance.saturating_mul(rate);
        let principal_component = payment.saturating_sub(interest);
        cumulative_interest = cumulative_interest.saturating_add(interest);
        let ending_balance = balance.saturating_sub(principal_component);

        schedule.push(AmortizationRow {
            period,
            beginning_balance: balance,
            payment,
            principal_component,
            interest_component: interest,
            ending_balance,
            cumulative_interest,
        });

        balance = ending_balance;
    }

    let total_payment = payment.saturating_mul(Decimal::from(inputs.term_periods));
    let total_interest = total_payment.saturating_sub(inputs.principal);

    AmortizationResult {
        periodic_payment: payment,
        total_payment,
        total_interest,
        schedule,
        payment_fallback: fallback,
    }
}

/// Validate loan terms, compute the schedule and wrap it with metadata.
pub fn calculate_loan(
    inputs: &LoanInputs,
) -> LoanCalcResult<ComputationOutput<AmortizationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_inputs(inputs)?;

    if inputs.term_periods > MAX_TYPICAL_TERM_PERIODS {
        warnings.push(format!(
            "Term of {} periods exceeds the typical maximum of {MAX_TYPICAL_TERM_PERIODS}",
            inputs.term_periods
        ));
    }
    if inputs.annual_rate_percent > MAX_TYPICAL_RATE_PERCENT {
        warnings.push(format!(
            "Annual rate of {}% is above {MAX_TYPICAL_RATE_PERCENT}%",
            inputs.annual_rate_percent
        ));
    }

    let result = compute_amortization(inputs);

    if result.payment_fallback {
        warnings.push(
            "Periodic payment could not be represented for these inputs; reported as 0".into(),
        );
    }

    tracing::debug!(
        principal = %inputs.principal,
        annual_rate_percent = %inputs.annual_rate_percent,
        term_periods = inputs.term_periods,
        periodic_payment = %result.periodic_payment,
        "loan amortized"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization (EMI), monthly compounding",
        &serde_json::json!({
            "principal": inputs.principal.to_string(),
            "annual_rate_percent": inputs.annual_rate_percent.to_string(),
            "term_periods": inputs.term_periods,
            "periodic_rate": periodic_rate(inputs.annual_rate_percent).to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Reject loan terms the engine cannot meaningfully amortize.
///
/// Every caller-facing entry point runs this before [`compute_amortization`].
pub fn validate_inputs(inputs: &LoanInputs) -> LoanCalcResult<()> {
    if inputs.principal <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if inputs.annual_rate_percent < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Annual rate cannot be negative".into(),
        });
    }
    if inputs.term_periods == 0 {
        return Err(LoanCalcError::InvalidInput {
            field: "term_periods".into(),
            reason: "Term must be at least 1 period".into(),
        });
    }
    if inputs.term_periods > MAX_TERM_PERIODS {
        return Err(LoanCalcError::InvalidInput {
            field: "term_periods".into(),
            reason: format!("Term cannot exceed {MAX_TERM_PERIODS} periods"),
        });
    }
    Ok(())
}
