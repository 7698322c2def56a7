pub mod emi;
pub mod loan;
pub mod mortgage;

use clap::ValueEnum;
use serde::de::DeserializeOwned;

use loan_amortization_core::loan::RoundingPolicy;
use loan_amortization_core::Currency;

use crate::input;

/// Final-period rounding treatment selectable from the command line
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum PolicyArg {
    /// Floor the final balance at zero, keep every payment equal
    #[default]
    Clamp,
    /// Resize the last payment so the balance ends at exactly zero
    AdjustFinal,
}

impl From<PolicyArg> for RoundingPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Clamp => RoundingPolicy::ClampOnly,
            PolicyArg::AdjustFinal => RoundingPolicy::AdjustFinalPayment,
        }
    }
}

/// Structured input from `--input <file>` or piped stdin, if either was given.
pub fn structured_input<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Some(input::file::read_input(path)?)),
        None => input::stdin::read_stdin(),
    }
}

/// Map an ISO 4217 code onto a known currency, keeping unknown codes verbatim.
pub fn parse_currency(code: &str) -> Currency {
    match code.trim().to_ascii_uppercase().as_str() {
        "GBP" => Currency::GBP,
        "USD" => Currency::USD,
        "EUR" => Currency::EUR,
        "INR" => Currency::INR,
        "CHF" => Currency::CHF,
        "JPY" => Currency::JPY,
        "CAD" => Currency::CAD,
        "AUD" => Currency::AUD,
        "HKD" => Currency::HKD,
        "SGD" => Currency::SGD,
        other => Currency::Other(other.to_string()),
    }
}
