use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent, Rate};

/// Periods are months.
pub const PERIODS_PER_YEAR: u32 = 12;

/// Borrower-facing loan terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanInputs {
    /// Amount borrowed, in the loan's native currency.
    pub principal: Money,
    /// Nominal annual rate in percent (5 = 5% p.a.).
    pub annual_rate_percent: Percent,
    /// Number of monthly installments.
    pub term_periods: u32,
}

impl Default for LoanInputs {
    fn default() -> Self {
        Self {
            principal: dec!(100000),
            annual_rate_percent: dec!(5),
            term_periods: 12,
        }
    }
}

/// Outcome of the installment formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCalc {
    pub payment: Money,
    /// True when the formula was not representable and `payment` was forced to zero.
    pub fallback: bool,
}

/// Convert an annual percentage into a per-period decimal rate.
pub fn periodic_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / Decimal::from(PERIODS_PER_YEAR) / dec!(100)
}

/// Fixed installment that fully amortizes `principal` over `term_periods`.
///
/// EMI = P * r / (1 - (1+r)^-n), or P / n when r = 0.
///
/// A growth factor `(1+r)^n` beyond the Decimal range makes `(1+r)^-n`
/// negligible, so the installment tends to the interest-only `P * r`. A zero
/// term or an installment that itself cannot be represented yields a zero
/// payment with `fallback` set, so callers always receive a finite figure.
pub fn periodic_payment(principal: Money, rate: Rate, term_periods: u32) -> PaymentCalc {
    let payment = if rate.is_zero() {
        principal.checked_div(Decimal::from(term_periods))
    } else {
        annuity_payment(principal, rate, term_periods)
    };

    match payment {
        Some(payment) => PaymentCalc {
            payment,
            fallback: false,
        },
        None => {
            tracing::warn!(
                %principal,
                %rate,
                term_periods,
                "periodic payment not representable; falling back to zero"
            );
            PaymentCalc {
                payment: Decimal::ZERO,
                fallback: true,
            }
        }
    }
}

fn annuity_payment(principal: Money, rate: Rate, term_periods: u32) -> Option<Money> {
    if term_periods == 0 {
        return None;
    }
    let growth = Decimal::ONE.checked_add(rate)?;
    let discount = match growth.checked_powi(i64::from(term_periods)) {
        Some(compounded) => Decimal::ONE.checked_div(compounded)?,
        None => Decimal::ZERO,
    };
    let denominator = Decimal::ONE.checked_sub(discount)?;
    principal.checked_mul(rate)?.checked_div(denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_periodic_rate_monthly() {
        let r = periodic_rate(dec!(6));
        assert_eq!(r, dec!(0.005));
    }

    #[test]
    fn test_periodic_rate_zero() {
        assert!(periodic_rate(Decimal::ZERO).is_zero());
    }

    #[test]
    fn test_payment_known_answer() {
        // 100k at 5% over 12 months => ~8,560.75
        let calc = periodic_payment(dec!(100000), periodic_rate(dec!(5)), 12);
        assert!(!calc.fallback);
        assert!(
            (calc.payment - dec!(8560.75)).abs() < dec!(0.01),
            "Expected ~8560.75, got {}",
            calc.payment
        );
    }

    #[test]
    fn test_payment_zero_rate_is_straight_division() {
        let calc = periodic_payment(dec!(12000), Decimal::ZERO, 12);
        assert_eq!(calc.payment, dec!(1000));
        assert!(!calc.fallback);
    }

    #[test]
    fn test_payment_zero_term_falls_back() {
        let calc = periodic_payment(dec!(5000), periodic_rate(dec!(5)), 0);
        assert_eq!(calc.payment, Decimal::ZERO);
        assert!(calc.fallback);

        let calc = periodic_payment(dec!(5000), Decimal::ZERO, 0);
        assert_eq!(calc.payment, Decimal::ZERO);
        assert!(calc.fallback);
    }

    #[test]
    fn test_payment_huge_growth_tends_to_interest_only() {
        // (1.25)^360 is beyond the Decimal range; the installment is still ~P * r
        let calc = periodic_payment(dec!(100000), periodic_rate(dec!(300)), 360);
        assert!(!calc.fallback);
        assert_eq!(calc.payment, dec!(25000));
    }

    #[test]
    fn test_payment_unrepresentable_installment_falls_back() {
        // P * r alone exceeds the Decimal range
        let calc = periodic_payment(dec!(70000000000000000000000000000), dec!(2), 12);
        assert_eq!(calc.payment, Decimal::ZERO);
        assert!(calc.fallback);
    }

    #[test]
    fn test_payment_single_period() {
        // One period: repay principal plus one month of interest
        let calc = periodic_payment(dec!(1200), dec!(0.01), 1);
        assert!((calc.payment - dec!(1212)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_default_inputs() {
        let inputs = LoanInputs::default();
        assert_eq!(inputs.principal, dec!(100000));
        assert_eq!(inputs.annual_rate_percent, dec!(5));
        assert_eq!(inputs.term_periods, 12);
    }
}
