use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_amortization_core::emi::{self, EmiInput, TenureUnit};

use super::{parse_currency, structured_input, PolicyArg};

/// Arguments for the EMI calculator
#[derive(Args)]
pub struct EmiArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 9 for 9%)
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Loan tenure, in years unless --months is given
    #[arg(long)]
    pub tenure: Option<Decimal>,

    /// Interpret --tenure as months
    #[arg(long)]
    pub months: bool,

    /// Final-period rounding treatment
    #[arg(long, value_enum, default_value_t)]
    pub policy: PolicyArg,

    /// ISO currency code used for display rounding
    #[arg(long, default_value = "INR")]
    pub currency: String,

    /// Due date of the first instalment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment: Option<NaiveDate>,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let emi_input: EmiInput = match structured_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => EmiInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            tenure: args.tenure.ok_or("--tenure is required (or provide --input)")?,
            tenure_unit: if args.months {
                TenureUnit::Months
            } else {
                TenureUnit::Years
            },
            rounding_policy: args.policy.into(),
            currency: parse_currency(&args.currency),
            first_payment_date: args.first_payment,
        },
    };

    let result = emi::calculate_emi(&emi_input)?;
    Ok(serde_json::to_value(result)?)
}
