//! Fixed-rate loan amortization.
//!
//! One recomputation pass runs validation, payment pricing, schedule
//! generation and aggregation in that order and yields either a complete
//! [`LoanSummary`] or an error; nothing is cached between calls.

pub mod metrics;
pub mod params;
pub mod payment;
pub mod schedule;
pub mod state;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::*;
use crate::AmortizationResult;

pub use metrics::{AggregateMetrics, YearSummary};
pub use params::{LoanParameters, MAX_PERIODS};
pub use schedule::{RoundingPolicy, ScheduleRow};
pub use state::LoanCalculator;

const LONG_TERM_WARNING_PERIODS: u32 = 480;

/// Input for a full amortization run on a periodic rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    /// Rate per payment period (e.g. 0.0075 for 9% p.a. paid monthly)
    pub periodic_rate: Rate,
    /// Number of payments; must be a whole number
    pub period_count: Decimal,
    #[serde(default)]
    pub rounding_policy: RoundingPolicy,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

/// Headline figures rounded to the currency's minor unit.
///
/// Display only: the schedule is always computed from the full-precision
/// payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFigures {
    pub periodic_payment: Money,
    pub final_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
}

/// Complete result of one amortization pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub periodic_payment: Money,
    pub schedule: Vec<ScheduleRow>,
    pub total_payment: Money,
    pub total_interest: Money,
    /// Balance the final period would have left before clamping/correction
    pub rounding_drift: Money,
    pub display: DisplayFigures,
}

impl LoanSummary {
    pub fn final_balance(&self) -> Money {
        self.schedule
            .last()
            .map(|row| row.remaining_balance)
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of principal components, saturating at the decimal range.
    pub fn total_principal(&self) -> Money {
        self.schedule
            .iter()
            .fold(Decimal::ZERO, |acc, row| acc.saturating_add(row.principal_component))
    }
}

/// Compute a loan summary with the default clamp-only policy.
pub fn compute_loan_summary(
    principal: Money,
    periodic_rate: Rate,
    period_count: Decimal,
) -> AmortizationResult<LoanSummary> {
    let params = LoanParameters::new(principal, periodic_rate, period_count)?;
    summarize(&params, RoundingPolicy::default(), &Currency::default(), None)
}

/// Run the engine on validated parameters.
pub fn summarize(
    params: &LoanParameters,
    policy: RoundingPolicy,
    currency: &Currency,
    first_payment_date: Option<NaiveDate>,
) -> AmortizationResult<LoanSummary> {
    let periodic_payment = payment::periodic_payment(params)?;
    let mut sched = schedule::generate_schedule(params, periodic_payment, policy)?;
    if let Some(first) = first_payment_date {
        schedule::assign_payment_dates(&mut sched.rows, first)?;
    }
    let totals = metrics::aggregate(&sched.rows, periodic_payment, params, policy)?;

    let final_payment = sched
        .rows
        .last()
        .map(|row| row.payment)
        .unwrap_or(periodic_payment);

    let display = DisplayFigures {
        periodic_payment: currency.round(periodic_payment),
        final_payment: currency.round(final_payment),
        total_payment: currency.round(totals.total_payment),
        total_interest: currency.round(totals.total_interest),
    };

    Ok(LoanSummary {
        periodic_payment,
        schedule: sched.rows,
        total_payment: totals.total_payment,
        total_interest: totals.total_interest,
        rounding_drift: sched.rounding_drift,
        display,
    })
}

/// Diagnostics shared by every caller surface.
pub(crate) fn summary_warnings(
    params: &LoanParameters,
    summary: &LoanSummary,
    policy: RoundingPolicy,
    currency: &Currency,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if params.is_zero_rate() {
        warnings.push("Zero interest rate: payment is principal divided by period count".into());
    }
    if params.period_count() > LONG_TERM_WARNING_PERIODS {
        warnings.push(format!(
            "{} periods exceeds {}: interest dominates early payments",
            params.period_count(),
            LONG_TERM_WARNING_PERIODS
        ));
    }
    if summary.rounding_drift.abs() >= currency.minor_unit() {
        let action = match policy {
            RoundingPolicy::AdjustFinalPayment => "absorbed by the final payment",
            RoundingPolicy::ClampOnly if summary.rounding_drift < Decimal::ZERO => {
                "clamped to zero"
            }
            RoundingPolicy::ClampOnly => "left outstanding",
        };
        warnings.push(format!(
            "Final balance residue of {} {}",
            summary.rounding_drift.round_dp(currency.minor_units() + 2),
            action
        ));
    }
    if summary.total_interest / dec!(2) > params.principal() {
        warnings.push("Total interest exceeds twice the principal".into());
    }

    warnings
}

/// Full amortization run wrapped in the standard output envelope.
pub fn amortize(input: &LoanInput) -> AmortizationResult<ComputationOutput<LoanSummary>> {
    let start = Instant::now();

    let params = LoanParameters::new(input.principal, input.periodic_rate, input.period_count)?;
    let summary = summarize(
        &params,
        input.rounding_policy,
        &input.currency,
        input.first_payment_date,
    )?;
    let warnings = summary_warnings(&params, &summary, input.rounding_policy, &input.currency);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Annuity Amortization",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "periodic_rate": input.periodic_rate.to_string(),
            "period_count": params.period_count(),
            "rounding_policy": input.rounding_policy,
            "currency": input.currency,
        }),
        warnings,
        elapsed,
        summary,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AmortizationError;

    fn loan_input() -> LoanInput {
        LoanInput {
            principal: dec!(500000),
            periodic_rate: dec!(0.0075),
            period_count: dec!(24),
            rounding_policy: RoundingPolicy::ClampOnly,
            currency: Currency::INR,
            first_payment_date: None,
        }
    }

    #[test]
    fn test_summary_consistency() {
        let summary = compute_loan_summary(dec!(500000), dec!(0.0075), dec!(24)).unwrap();
        assert_eq!(summary.schedule.len(), 24);
        assert_eq!(summary.total_payment, summary.periodic_payment * dec!(24));
        assert_eq!(summary.total_interest, summary.total_payment - dec!(500000));
        assert!(summary.final_balance() < dec!(0.01));
        assert!((summary.total_principal() - dec!(500000)).abs() < dec!(0.01));
    }

    #[test]
    fn test_display_is_rounded_but_schedule_is_not() {
        let summary = compute_loan_summary(dec!(500000), dec!(0.0075), dec!(24)).unwrap();
        assert_eq!(summary.display.periodic_payment, dec!(22842.37));
        assert!(summary.periodic_payment.scale() > 2);
        assert!(summary.schedule.iter().all(|r| r.payment == summary.periodic_payment));
    }

    #[test]
    fn test_invalid_principal_produces_no_summary() {
        let err = compute_loan_summary(Decimal::ZERO, dec!(0.0075), dec!(24)).unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidInput { ref field, .. } if field == "principal"));
    }

    #[test]
    fn test_amortize_envelope() {
        let output = amortize(&loan_input()).unwrap();
        assert_eq!(output.methodology, "Fixed-Rate Annuity Amortization");
        assert!(output.warnings.is_empty());
        assert_eq!(output.assumptions["period_count"], 24);
        assert_eq!(output.result.schedule.len(), 24);
    }

    #[test]
    fn test_zero_rate_warning() {
        let mut input = loan_input();
        input.periodic_rate = Decimal::ZERO;
        let output = amortize(&input).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("Zero interest rate")));
    }

    #[test]
    fn test_first_payment_date_stamps_rows() {
        let mut input = loan_input();
        input.first_payment_date = NaiveDate::from_ymd_opt(2025, 1, 5);
        let output = amortize(&input).unwrap();
        let last = output.result.schedule.last().unwrap();
        assert_eq!(last.payment_date, NaiveDate::from_ymd_opt(2026, 12, 5));
    }

    #[test]
    fn test_deserialize_defaults() {
        let input: LoanInput = serde_json::from_str(
            r#"{"principal": "1000", "periodic_rate": "0.01", "period_count": "12"}"#,
        )
        .unwrap();
        assert_eq!(input.rounding_policy, RoundingPolicy::ClampOnly);
        assert_eq!(input.currency, Currency::USD);
        assert!(input.first_payment_date.is_none());
    }

    #[test]
    fn test_overflow_after_pricing_yields_no_summary() {
        // Payment ~7.0e27 is representable, the lifetime total is not
        let err = compute_loan_summary(dec!(79000000000000000000000000000), dec!(0.01), dec!(12))
            .unwrap_err();
        assert!(matches!(
            err,
            AmortizationError::NumericOverflow { ref context } if context == "total payment"
        ));
    }

    #[test]
    fn test_near_max_principal_warnings_do_not_overflow() {
        let mut input = loan_input();
        input.principal = dec!(50000000000000000000000000000);
        let output = amortize(&input).unwrap();
        assert!(output.result.total_payment > input.principal);
        assert!(!output.warnings.iter().any(|w| w.contains("twice the principal")));
    }

    #[test]
    fn test_interest_over_twice_principal_warns() {
        let mut input = loan_input();
        input.periodic_rate = dec!(0.1);
        input.period_count = dec!(60);
        let output = amortize(&input).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("twice the principal")));
    }

    #[test]
    fn test_precision_limited_loan_reports_outstanding_residue() {
        // 1.1^720 exceeds 28 significant digits: the payment is exact to the
        // last digit but the principal it retires is not representable
        let mut input = loan_input();
        input.principal = dec!(1000);
        input.periodic_rate = dec!(0.1);
        input.period_count = dec!(720);
        let output = amortize(&input).unwrap();
        assert_eq!(output.result.display.periodic_payment, dec!(100.00));
        assert!(output.warnings.iter().any(|w| w.contains("left outstanding")));
    }
}
