//! Residential mortgage calculator.
//!
//! The loan amount is the home price less the down payment and is amortized
//! monthly by the engine. Property tax, homeowner's insurance and HOA dues
//! do not amortize; they are converted to monthly figures and added on top
//! of principal and interest here, outside the engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::emi::{monthly_rate_from_annual_pct, tenure_in_months, TenureUnit};
use crate::error::AmortizationError;
use crate::loan::{self, LoanParameters, RoundingPolicy, ScheduleRow, YearSummary};
use crate::types::*;
use crate::AmortizationResult;

const CONVENTIONAL_DOWN_PAYMENT: Decimal = dec!(0.20);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    pub home_price: Money,
    pub down_payment: Money,
    /// Annual interest rate in percent (6.5 = 6.5% p.a.)
    pub annual_rate_pct: Decimal,
    pub term_years: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_property_tax: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_insurance: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_hoa: Option<Money>,
    #[serde(default)]
    pub rounding_policy: RoundingPolicy,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageOutput {
    pub loan_amount: Money,
    pub down_payment_pct: Decimal,
    pub monthly_principal_and_interest: Money,
    pub monthly_property_tax: Money,
    pub monthly_insurance: Money,
    pub monthly_hoa: Money,
    pub total_monthly_payment: Money,
    pub total_interest: Money,
    /// Principal and interest over the full term
    pub total_of_loan_payments: Money,
    /// Down payment, loan payments and all non-amortizing costs over the term
    pub total_cost_of_ownership: Money,
    pub rounding_drift: Money,
    pub display: loan::DisplayFigures,
    pub yearly: Vec<YearSummary>,
    pub schedule: Vec<ScheduleRow>,
}

fn overflow(context: &str) -> AmortizationError {
    AmortizationError::NumericOverflow {
        context: context.into(),
    }
}

fn validate_input(input: &MortgageInput) -> AmortizationResult<()> {
    if input.home_price <= Decimal::ZERO {
        return Err(AmortizationError::InvalidInput {
            field: "home_price".into(),
            reason: "Home price must be positive".into(),
        });
    }
    if input.down_payment < Decimal::ZERO {
        return Err(AmortizationError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot be negative".into(),
        });
    }
    if input.down_payment >= input.home_price {
        return Err(AmortizationError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment must be less than the home price".into(),
        });
    }

    let costs = [
        ("annual_property_tax", input.annual_property_tax),
        ("annual_insurance", input.annual_insurance),
        ("monthly_hoa", input.monthly_hoa),
    ];
    for (field, value) in costs {
        if value.is_some_and(|v| v < Decimal::ZERO) {
            return Err(AmortizationError::InvalidInput {
                field: field.into(),
                reason: "Recurring costs cannot be negative".into(),
            });
        }
    }
    Ok(())
}

pub fn calculate_mortgage(
    input: &MortgageInput,
) -> AmortizationResult<ComputationOutput<MortgageOutput>> {
    let start = Instant::now();
    validate_input(input)?;

    let loan_amount = input.home_price - input.down_payment;
    let months = tenure_in_months(input.term_years, TenureUnit::Years);
    let params = LoanParameters::new(
        loan_amount,
        monthly_rate_from_annual_pct(input.annual_rate_pct),
        months,
    )?;

    let summary = loan::summarize(
        &params,
        input.rounding_policy,
        &input.currency,
        input.first_payment_date,
    )?;
    let mut warnings =
        loan::summary_warnings(&params, &summary, input.rounding_policy, &input.currency);

    let down_payment_pct = input.down_payment / input.home_price;
    if down_payment_pct < CONVENTIONAL_DOWN_PAYMENT {
        warnings.push(format!(
            "Down payment of {:.1}% is below 20%; lenders typically require mortgage insurance",
            down_payment_pct * dec!(100)
        ));
    }

    let monthly_property_tax = input.annual_property_tax.unwrap_or(Decimal::ZERO) / dec!(12);
    let monthly_insurance = input.annual_insurance.unwrap_or(Decimal::ZERO) / dec!(12);
    let monthly_hoa = input.monthly_hoa.unwrap_or(Decimal::ZERO);
    let monthly_extras = monthly_property_tax
        .checked_add(monthly_insurance)
        .and_then(|extras| extras.checked_add(monthly_hoa))
        .ok_or_else(|| overflow("monthly escrow costs"))?;

    let total_monthly_payment = summary
        .periodic_payment
        .checked_add(monthly_extras)
        .ok_or_else(|| overflow("total monthly payment"))?;
    let total_cost_of_ownership = monthly_extras
        .checked_mul(Decimal::from(params.period_count()))
        .and_then(|extras| extras.checked_add(summary.total_payment))
        .and_then(|total| total.checked_add(input.down_payment))
        .ok_or_else(|| overflow("total cost of ownership"))?;
    let yearly = loan::metrics::yearly_breakdown(&summary.schedule)?;

    let output = MortgageOutput {
        loan_amount,
        down_payment_pct,
        monthly_principal_and_interest: summary.periodic_payment,
        monthly_property_tax,
        monthly_insurance,
        monthly_hoa,
        total_monthly_payment,
        total_interest: summary.total_interest,
        total_of_loan_payments: summary.total_payment,
        total_cost_of_ownership,
        rounding_drift: summary.rounding_drift,
        display: summary.display,
        yearly,
        schedule: summary.schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Mortgage (monthly amortization plus escrowed costs)",
        &serde_json::json!({
            "home_price": input.home_price.to_string(),
            "down_payment": input.down_payment.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "term_years": input.term_years.to_string(),
            "rounding_policy": input.rounding_policy,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> MortgageInput {
        MortgageInput {
            home_price: dec!(350000),
            down_payment: dec!(70000),
            annual_rate_pct: dec!(6.5),
            term_years: dec!(30),
            annual_property_tax: Some(dec!(4200)),
            annual_insurance: Some(dec!(1200)),
            monthly_hoa: Some(dec!(150)),
            rounding_policy: RoundingPolicy::ClampOnly,
            currency: Currency::USD,
            first_payment_date: None,
        }
    }

    #[test]
    fn test_thirty_year_mortgage() {
        let result = calculate_mortgage(&sample_input()).unwrap();
        let out = &result.result;

        assert_eq!(out.loan_amount, dec!(280000));
        assert_eq!(out.down_payment_pct, dec!(0.2));
        assert_eq!(out.schedule.len(), 360);
        assert_eq!(out.yearly.len(), 30);
        assert_eq!(out.display.periodic_payment, dec!(1769.79));
        assert!(out.schedule.last().unwrap().remaining_balance < dec!(0.01));
    }

    #[test]
    fn test_escrow_costs_added_outside_amortization() {
        let result = calculate_mortgage(&sample_input()).unwrap();
        let out = &result.result;

        assert_eq!(out.monthly_property_tax, dec!(350));
        assert_eq!(out.monthly_insurance, dec!(100));
        assert_eq!(out.monthly_hoa, dec!(150));
        assert_eq!(
            out.total_monthly_payment,
            out.monthly_principal_and_interest + dec!(600)
        );
        // Extras never touch the schedule
        assert!(out
            .schedule
            .iter()
            .all(|r| r.payment == out.monthly_principal_and_interest));
        assert_eq!(
            out.total_cost_of_ownership,
            dec!(70000) + out.total_of_loan_payments + dec!(600) * dec!(360)
        );
    }

    #[test]
    fn test_low_down_payment_warning() {
        let mut input = sample_input();
        input.down_payment = dec!(17500);
        let result = calculate_mortgage(&input).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("below 20%")));
    }

    #[test]
    fn test_down_payment_covers_price() {
        let mut input = sample_input();
        input.down_payment = dec!(350000);
        let err = calculate_mortgage(&input).unwrap_err();
        assert_eq!(err.field(), Some("down_payment"));
    }

    #[test]
    fn test_negative_hoa_rejected() {
        let mut input = sample_input();
        input.monthly_hoa = Some(dec!(-1));
        let err = calculate_mortgage(&input).unwrap_err();
        assert_eq!(err.field(), Some("monthly_hoa"));
    }

    #[test]
    fn test_no_optional_costs() {
        let mut input = sample_input();
        input.annual_property_tax = None;
        input.annual_insurance = None;
        input.monthly_hoa = None;
        let result = calculate_mortgage(&input).unwrap();
        let out = &result.result;
        assert_eq!(out.total_monthly_payment, out.monthly_principal_and_interest);
    }

    #[test]
    fn test_cost_of_ownership_beyond_decimal_range_is_an_error() {
        // Loan totals fit; down payment plus a year of escrowed tax does not
        let mut input = sample_input();
        input.home_price = dec!(50000000000000000000000000000);
        input.down_payment = dec!(10000000000000000000000000000);
        input.annual_rate_pct = Decimal::ZERO;
        input.term_years = dec!(1);
        input.annual_property_tax = Some(dec!(50000000000000000000000000000));
        match calculate_mortgage(&input) {
            Err(AmortizationError::NumericOverflow { context }) => {
                assert_eq!(context, "total cost of ownership")
            }
            other => panic!("Expected NumericOverflow, got {other:?}"),
        }
    }

    #[test]
    fn test_unbounded_hoa_is_an_error() {
        let mut input = sample_input();
        input.monthly_hoa = Some(Decimal::MAX);
        let err = calculate_mortgage(&input).unwrap_err();
        assert!(matches!(err, AmortizationError::NumericOverflow { .. }));
    }

    #[test]
    fn test_huge_term_rejected_not_overflowed() {
        let mut input = sample_input();
        input.term_years = dec!(10000000000000000000000000000);
        let err = calculate_mortgage(&input).unwrap_err();
        assert_eq!(err.field(), Some("term"));
    }
}
