//! Equated Monthly Instalment (EMI) calculator.
//!
//! Takes the quoted annual percentage rate and a tenure in years or months,
//! converts them to a monthly periodic rate and payment count, and runs the
//! amortization engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::loan::{self, LoanParameters, RoundingPolicy, ScheduleRow, YearSummary};
use crate::types::*;
use crate::AmortizationResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Unit of the tenure figure supplied by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenureUnit {
    #[default]
    Years,
    Months,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiInput {
    pub principal: Money,
    /// Annual interest rate in percent (9 = 9% p.a.)
    pub annual_rate_pct: Decimal,
    pub tenure: Decimal,
    #[serde(default)]
    pub tenure_unit: TenureUnit,
    #[serde(default)]
    pub rounding_policy: RoundingPolicy,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiOutput {
    pub principal: Money,
    pub monthly_rate: Rate,
    pub tenure_months: u32,
    pub emi: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    /// Share of total payments that repays principal, in percent
    pub principal_share_pct: Decimal,
    pub interest_share_pct: Decimal,
    pub rounding_drift: Money,
    pub display: loan::DisplayFigures,
    pub yearly: Vec<YearSummary>,
    pub schedule: Vec<ScheduleRow>,
}

/// Annual percent to monthly periodic rate: `pct / 12 / 100`.
pub fn monthly_rate_from_annual_pct(annual_rate_pct: Decimal) -> Rate {
    annual_rate_pct / MONTHS_PER_YEAR / PERCENT
}

/// Tenure in the given unit to a month count (`years * 12`), unvalidated.
///
/// Saturates at the decimal range so the period cap rejects it.
pub fn tenure_in_months(tenure: Decimal, unit: TenureUnit) -> Decimal {
    match unit {
        TenureUnit::Years => tenure.saturating_mul(MONTHS_PER_YEAR),
        TenureUnit::Months => tenure,
    }
}

pub fn calculate_emi(input: &EmiInput) -> AmortizationResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();

    let monthly_rate = monthly_rate_from_annual_pct(input.annual_rate_pct);
    let months = tenure_in_months(input.tenure, input.tenure_unit);
    let params = LoanParameters::new(input.principal, monthly_rate, months)?;

    let summary = loan::summarize(
        &params,
        input.rounding_policy,
        &input.currency,
        input.first_payment_date,
    )?;
    let warnings =
        loan::summary_warnings(&params, &summary, input.rounding_policy, &input.currency);

    let (principal_share_pct, interest_share_pct) = if summary.total_payment.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let principal_share = (input.principal / summary.total_payment * PERCENT).round_dp(2);
        (principal_share, PERCENT - principal_share)
    };

    let output = EmiOutput {
        principal: input.principal,
        monthly_rate,
        tenure_months: params.period_count(),
        emi: summary.periodic_payment,
        total_interest: summary.total_interest,
        total_payment: summary.total_payment,
        principal_share_pct,
        interest_share_pct,
        rounding_drift: summary.rounding_drift,
        display: summary.display,
        yearly: loan::metrics::yearly_breakdown(&summary.schedule)?,
        schedule: summary.schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "EMI (reducing balance, monthly compounding)",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "tenure": input.tenure.to_string(),
            "tenure_unit": input.tenure_unit,
            "rounding_policy": input.rounding_policy,
        }),
        warnings,
        elapsed,
        output,
    ))
}
