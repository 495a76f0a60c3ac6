//! Level-payment (EMI) loan amortization.
//!
//! [`emi`] derives the per-period rate and the fixed installment;
//! [`schedule`] walks the installment across every period and wraps the
//! result in the standard output envelope.

pub mod emi;
pub mod schedule;

pub use emi::{periodic_payment, periodic_rate, LoanInputs, PaymentCalc, PERIODS_PER_YEAR};
pub use schedule::{
    calculate_loan, compute_amortization, validate_inputs, AmortizationResult, AmortizationRow,
};
