use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_amortization_core::loan::{self, LoanInput};

use super::{parse_currency, structured_input, PolicyArg};

/// Arguments for a raw periodic-rate amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Interest rate per payment period as a decimal (e.g. 0.0075)
    #[arg(long)]
    pub periodic_rate: Option<Decimal>,

    /// Number of payments
    #[arg(long)]
    pub periods: Option<Decimal>,

    /// Final-period rounding treatment
    #[arg(long, value_enum, default_value_t)]
    pub policy: PolicyArg,

    /// ISO currency code used for display rounding
    #[arg(long, default_value = "USD")]
    pub currency: String,

    /// Due date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment: Option<NaiveDate>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInput = match structured_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => LoanInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            periodic_rate: args
                .periodic_rate
                .ok_or("--periodic-rate is required (or provide --input)")?,
            period_count: args
                .periods
                .ok_or("--periods is required (or provide --input)")?,
            rounding_policy: args.policy.into(),
            currency: parse_currency(&args.currency),
            first_payment_date: args.first_payment,
        },
    };

    let result = loan::amortize(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}
