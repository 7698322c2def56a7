use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AmortizationError;
use crate::loan::params::LoanParameters;
use crate::loan::schedule::{RoundingPolicy, ScheduleRow};
use crate::types::Money;
use crate::AmortizationResult;

fn overflow(context: &str) -> AmortizationError {
    AmortizationError::NumericOverflow {
        context: context.into(),
    }
}

/// Lifetime totals of a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub total_payment: Money,
    pub total_interest: Money,
}

/// Derive total payment and total interest.
///
/// Under `ClampOnly` the total is the constant payment times the period
/// count, independent of any clamped final row. Under `AdjustFinalPayment`
/// the last row's resized payment replaces one regular payment.
pub fn aggregate(
    schedule: &[ScheduleRow],
    payment: Money,
    params: &LoanParameters,
    policy: RoundingPolicy,
) -> AmortizationResult<AggregateMetrics> {
    let periods = Decimal::from(params.period_count());

    let total_payment = match (policy, schedule.last()) {
        (RoundingPolicy::AdjustFinalPayment, Some(last)) => payment
            .checked_mul(periods - Decimal::ONE)
            .and_then(|regular| regular.checked_add(last.payment)),
        _ => payment.checked_mul(periods),
    }
    .ok_or_else(|| overflow("total payment"))?;

    let total_interest = total_payment
        .checked_sub(params.principal())
        .ok_or_else(|| overflow("total interest"))?;

    Ok(AggregateMetrics {
        total_payment,
        total_interest,
    })
}

/// Principal and interest paid within one year of a monthly schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub ending_balance: Money,
}

/// Roll a monthly schedule up into loan years (periods 1-12 are year 1).
/// A trailing partial year is reported as its own entry.
pub fn yearly_breakdown(schedule: &[ScheduleRow]) -> AmortizationResult<Vec<YearSummary>> {
    schedule
        .chunks(12)
        .zip(1u32..)
        .map(|(months, year)| {
            let (principal_paid, interest_paid) = months.iter().try_fold(
                (Decimal::ZERO, Decimal::ZERO),
                |(principal, interest), row| {
                    Some((
                        principal.checked_add(row.principal_component)?,
                        interest.checked_add(row.interest_component)?,
                    ))
                },
            )
            .ok_or_else(|| overflow("yearly breakdown"))?;

            Ok(YearSummary {
                year,
                principal_paid,
                interest_paid,
                ending_balance: months
                    .last()
                    .map(|r| r.remaining_balance)
                    .unwrap_or(Decimal::ZERO),
            })
        })
        .collect()
}
