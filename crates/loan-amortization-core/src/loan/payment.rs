use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::AmortizationError;
use crate::loan::params::LoanParameters;
use crate::types::{Money, Rate};
use crate::AmortizationResult;

/// Annuity ratio `(1+r)^n / ((1+r)^n - 1)`, i.e. `1 / (1 - (1+r)^-n)`.
///
/// When `(1+r)^n` leaves the decimal range the discount factor `(1+r)^-n`
/// is smaller than the finest representable step, so the ratio is exactly one.
pub fn annuity_ratio(rate: Rate, periods: u32) -> AmortizationResult<Decimal> {
    let growth = match Decimal::ONE
        .checked_add(rate)
        .and_then(|base| base.checked_powu(u64::from(periods)))
    {
        Some(growth) => growth,
        None => return Ok(Decimal::ONE),
    };

    growth
        .checked_sub(Decimal::ONE)
        .and_then(|denominator| growth.checked_div(denominator))
        .ok_or_else(|| AmortizationError::NumericOverflow {
            context: "annuity denominator".into(),
        })
}

/// Constant periodic payment for a fully amortizing loan.
///
/// `P * r / (1 - (1+r)^-n)`, or `P / n` when the rate is zero. Only a
/// payment that itself exceeds the decimal range is an overflow.
pub fn periodic_payment(params: &LoanParameters) -> AmortizationResult<Money> {
    let principal = params.principal();
    let periods = params.period_count();

    if params.is_zero_rate() {
        // No interest ever accrues: straight division of principal
        return Ok(principal / Decimal::from(periods));
    }

    let rate = params.periodic_rate();
    let ratio = annuity_ratio(rate, periods)?;

    principal
        .checked_mul(rate)
        .and_then(|interest_only| interest_only.checked_mul(ratio))
        .ok_or_else(|| AmortizationError::NumericOverflow {
            context: "periodic payment".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_emi_known_answer() {
        // 500k at 9% p.a. over 24 months
        let params = LoanParameters::from_periods(dec!(500000), dec!(0.0075), 24).unwrap();
        let payment = periodic_payment(&params).unwrap();
        assert!(
            (payment - dec!(22842.37)).abs() < dec!(0.01),
            "Expected EMI ~22842.37, got {payment}"
        );
    }

    #[test]
    fn test_mortgage_payment_sanity() {
        // 280k at 6.5% over 30 years, expected ~1769.79/mo
        let params =
            LoanParameters::from_periods(dec!(280000), dec!(0.065) / dec!(12), 360).unwrap();
        let payment = periodic_payment(&params).unwrap();
        assert!(
            (payment - dec!(1769.79)).abs() < dec!(0.01),
            "Monthly payment {payment} outside expected range"
        );
    }

    #[test]
    fn test_zero_rate_is_pure_division() {
        let params = LoanParameters::from_periods(dec!(360000), Decimal::ZERO, 360).unwrap();
        assert_eq!(periodic_payment(&params).unwrap(), dec!(1000));
    }

    #[test]
    fn test_single_period_repays_principal_plus_interest() {
        let params = LoanParameters::from_periods(dec!(1000), dec!(0.05), 1).unwrap();
        assert_eq!(periodic_payment(&params).unwrap(), dec!(1050));
    }

    #[test]
    fn test_long_high_rate_loan_prices_to_interest_only() {
        // 1.1^720 is beyond the decimal range; the payment is ~P*r
        let params = LoanParameters::from_periods(dec!(1000), dec!(0.1), 720).unwrap();
        let payment = periodic_payment(&params).unwrap();
        assert!(
            (payment - dec!(100)).abs() < dec!(0.0001),
            "Expected ~100.0000, got {payment}"
        );

        let params = LoanParameters::from_periods(dec!(1000), dec!(1), 100).unwrap();
        let payment = periodic_payment(&params).unwrap();
        assert!((payment - dec!(1000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_smallest_rate_still_prices() {
        // 1 + 1e-28 is exact, so the annuity denominator never collapses to zero
        let params =
            LoanParameters::from_periods(dec!(1200), dec!(0.0000000000000000000000000001), 12)
                .unwrap();
        let payment = periodic_payment(&params).unwrap();
        assert!(
            (payment - dec!(100)).abs() < dec!(0.0000001),
            "Expected ~P/n, got {payment}"
        );
    }

    #[test]
    fn test_unrepresentable_payment_is_overflow() {
        // P*r fits but P*r / (1 - 1/4) does not
        let params =
            LoanParameters::from_periods(dec!(79000000000000000000000000000), dec!(1), 2).unwrap();
        match periodic_payment(&params) {
            Err(AmortizationError::NumericOverflow { context }) => {
                assert_eq!(context, "periodic payment")
            }
            other => panic!("Expected NumericOverflow, got {other:?}"),
        }
    }

    #[test]
    fn test_annuity_ratio() {
        assert_eq!(annuity_ratio(dec!(1), 1).unwrap(), dec!(2));
        assert_eq!(annuity_ratio(dec!(0.5), 1200).unwrap(), Decimal::ONE);
        let ratio = annuity_ratio(dec!(0.1), 2).unwrap();
        assert!((ratio - dec!(5.7619047619)).abs() < dec!(0.0000000001));
    }
}
