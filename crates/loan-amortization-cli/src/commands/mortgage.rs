use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_amortization_core::mortgage::{self, MortgageInput};

use super::{parse_currency, structured_input, PolicyArg};

/// Arguments for the mortgage calculator
#[derive(Args)]
pub struct MortgageArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price of the home
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Cash paid up front
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub down_payment: Decimal,

    /// Annual interest rate in percent (e.g. 6.5)
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value_t = Decimal::from(30))]
    pub term_years: Decimal,

    /// Annual property tax
    #[arg(long)]
    pub property_tax: Option<Decimal>,

    /// Annual homeowner's insurance premium
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Monthly HOA dues
    #[arg(long)]
    pub hoa: Option<Decimal>,

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

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input: MortgageInput = match structured_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => MortgageInput {
            home_price: args
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            down_payment: args.down_payment,
            annual_rate_pct: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            term_years: args.term_years,
            annual_property_tax: args.property_tax,
            annual_insurance: args.insurance,
            monthly_hoa: args.hoa,
            rounding_policy: args.policy.into(),
            currency: parse_currency(&args.currency),
            first_payment_date: args.first_payment,
        },
    };

    let result = mortgage::calculate_mortgage(&mortgage_input)?;
    Ok(serde_json::to_value(result)?)
}
