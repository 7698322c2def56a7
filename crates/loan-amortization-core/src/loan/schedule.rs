use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AmortizationError;
use crate::loan::params::LoanParameters;
use crate::types::Money;
use crate::AmortizationResult;

/// How the final period treats the residue left by a non-terminating payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Floor the closing balance at zero; every row carries the same payment.
    #[default]
    ClampOnly,
    /// Resize the last payment so the closing balance is exactly zero.
    AdjustFinalPayment,
}

/// A single period in the amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub payment: Money,
    pub interest_component: Money,
    pub principal_component: Money,
    pub remaining_balance: Money,
}

/// Materialised schedule plus the balance the last period would have left
/// without clamping or correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub rows: Vec<ScheduleRow>,
    pub rounding_drift: Money,
}

/// Split every payment into interest and principal on the declining balance.
pub fn generate_schedule(
    params: &LoanParameters,
    payment: Money,
    policy: RoundingPolicy,
) -> AmortizationResult<Schedule> {
    let periods = params.period_count();
    let rate = params.periodic_rate();
    let overflow = |period: u32| AmortizationError::NumericOverflow {
        context: format!("schedule period {period}"),
    };

    let mut rows = Vec::with_capacity(periods as usize);
    let mut balance = params.principal();
    let mut rounding_drift = Decimal::ZERO;

    for period in 1..=periods {
        let interest = balance.checked_mul(rate).ok_or_else(|| overflow(period))?;
        let mut row_payment = payment;
        let mut principal_component = payment
            .checked_sub(interest)
            .ok_or_else(|| overflow(period))?;

        if period == periods {
            rounding_drift = balance
                .checked_sub(principal_component)
                .ok_or_else(|| overflow(period))?;
            if policy == RoundingPolicy::AdjustFinalPayment {
                principal_component = balance;
                row_payment = balance
                    .checked_add(interest)
                    .ok_or_else(|| overflow(period))?;
            }
        }

        balance = balance
            .checked_sub(principal_component)
            .ok_or_else(|| overflow(period))?
            .max(Decimal::ZERO);

        rows.push(ScheduleRow {
            period,
            payment_date: None,
            payment: row_payment,
            interest_component: interest,
            principal_component,
            remaining_balance: balance,
        });
    }

    Ok(Schedule {
        rows,
        rounding_drift,
    })
}

/// Stamp each row with a due date, one calendar month apart starting at `first`.
///
/// Month-end dates are clamped by chrono (Jan 31 -> Feb 28/29).
pub fn assign_payment_dates(rows: &mut [ScheduleRow], first: NaiveDate) -> AmortizationResult<()> {
    for row in rows.iter_mut() {
        let date = first
            .checked_add_months(Months::new(row.period - 1))
            .ok_or_else(|| AmortizationError::InvalidInput {
                field: "first_payment_date".into(),
                reason: format!("Payment date for period {} is out of range", row.period),
            })?;
        row.payment_date = Some(date);
    }
    Ok(())
}
