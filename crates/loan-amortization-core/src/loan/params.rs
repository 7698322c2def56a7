use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::AmortizationError;
use crate::types::{Money, Rate};
use crate::AmortizationResult;

/// Upper bound on the number of payment periods (100 years of monthly payments).
pub const MAX_PERIODS: u32 = 1200;

/// Validated inputs for a single fixed-rate, fixed-term loan.
///
/// Only constructible through [`LoanParameters::new`] or
/// [`LoanParameters::from_periods`], so every instance satisfies
/// `principal > 0`, `periodic_rate >= 0` and `0 < period_count <= MAX_PERIODS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanParameters {
    principal: Money,
    periodic_rate: Rate,
    period_count: u32,
}

impl LoanParameters {
    /// Validate raw caller values. `period_count` is taken as a decimal so a
    /// fractional term (e.g. 2.3 years converted to 27.6 months) is rejected
    /// rather than silently truncated.
    pub fn new(
        principal: Money,
        periodic_rate: Rate,
        period_count: Decimal,
    ) -> AmortizationResult<Self> {
        if principal <= Decimal::ZERO {
            return Err(AmortizationError::InvalidInput {
                field: "principal".into(),
                reason: "Principal must be positive".into(),
            });
        }
        if periodic_rate < Decimal::ZERO {
            return Err(AmortizationError::InvalidInput {
                field: "rate".into(),
                reason: "Periodic rate cannot be negative".into(),
            });
        }
        if period_count <= Decimal::ZERO {
            return Err(AmortizationError::InvalidInput {
                field: "term".into(),
                reason: "Number of periods must be > 0".into(),
            });
        }
        if !period_count.fract().is_zero() {
            return Err(AmortizationError::InvalidInput {
                field: "term".into(),
                reason: format!("Number of periods must be a whole number, got {period_count}"),
            });
        }

        let count = period_count
            .to_u32()
            .filter(|n| *n <= MAX_PERIODS)
            .ok_or_else(|| AmortizationError::InvalidInput {
                field: "term".into(),
                reason: format!("Number of periods must not exceed {MAX_PERIODS}"),
            })?;

        Ok(Self {
            principal,
            periodic_rate,
            period_count: count,
        })
    }

    pub fn from_periods(
        principal: Money,
        periodic_rate: Rate,
        period_count: u32,
    ) -> AmortizationResult<Self> {
        Self::new(principal, periodic_rate, Decimal::from(period_count))
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn periodic_rate(&self) -> Rate {
        self.periodic_rate
    }

    pub fn period_count(&self) -> u32 {
        self.period_count
    }

    pub fn is_zero_rate(&self) -> bool {
        self.periodic_rate.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn field_of(result: AmortizationResult<LoanParameters>) -> String {
        result.unwrap_err().field().unwrap().to_string()
    }

    #[test]
    fn test_valid_parameters() {
        let params = LoanParameters::new(dec!(500000), dec!(0.0075), dec!(24)).unwrap();
        assert_eq!(params.principal(), dec!(500000));
        assert_eq!(params.periodic_rate(), dec!(0.0075));
        assert_eq!(params.period_count(), 24);
        assert!(!params.is_zero_rate());
    }

    #[test]
    fn test_zero_rate_allowed() {
        let params = LoanParameters::from_periods(dec!(100000), Decimal::ZERO, 12).unwrap();
        assert!(params.is_zero_rate());
    }

    #[test]
    fn test_non_positive_principal() {
        assert_eq!(field_of(LoanParameters::new(dec!(0), dec!(0.01), dec!(12))), "principal");
        assert_eq!(field_of(LoanParameters::new(dec!(-5), dec!(0.01), dec!(12))), "principal");
    }

    #[test]
    fn test_negative_rate() {
        assert_eq!(field_of(LoanParameters::new(dec!(1000), dec!(-0.001), dec!(12))), "rate");
    }

    #[test]
    fn test_bad_term() {
        assert_eq!(field_of(LoanParameters::new(dec!(1000), dec!(0.01), dec!(0))), "term");
        assert_eq!(field_of(LoanParameters::new(dec!(1000), dec!(0.01), dec!(-12))), "term");
        assert_eq!(field_of(LoanParameters::new(dec!(1000), dec!(0.01), dec!(27.6))), "term");
    }

    #[test]
    fn test_period_cap() {
        assert!(LoanParameters::from_periods(dec!(1000), dec!(0.01), MAX_PERIODS).is_ok());
        assert_eq!(
            field_of(LoanParameters::from_periods(dec!(1000), dec!(0.01), MAX_PERIODS + 1)),
            "term"
        );
        assert_eq!(
            field_of(LoanParameters::new(dec!(1000), dec!(0.01), dec!(99999999999))),
            "term"
        );
    }

    #[test]
    fn test_trailing_zero_scale_is_whole() {
        // 2.0 years * 12 arrives as 24.0
        let params = LoanParameters::new(dec!(1000), dec!(0.01), dec!(24.0)).unwrap();
        assert_eq!(params.period_count(), 24);
    }
}
