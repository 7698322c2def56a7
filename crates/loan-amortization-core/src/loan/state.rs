use rust_decimal::Decimal;

use crate::error::AmortizationError;
use crate::loan::params::LoanParameters;
use crate::loan::schedule::RoundingPolicy;
use crate::loan::{summarize, LoanSummary};
use crate::types::{Currency, Money, Rate};

/// Where the last recomputation left the calculator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CalculatorState {
    /// No valid parameters supplied yet, or the latest ones were rejected.
    #[default]
    Idle,
    Computed(LoanSummary),
    /// Valid parameters that could not be priced (overflow and the like).
    Failed(AmortizationError),
}

/// Holds the outcome of the most recent recomputation for a caller that
/// re-runs the engine on every input change.
///
/// Each [`recompute`](LoanCalculator::recompute) is a full independent pass;
/// the previous summary is discarded before the new one is derived.
#[derive(Debug, Clone, Default)]
pub struct LoanCalculator {
    policy: RoundingPolicy,
    currency: Currency,
    state: CalculatorState,
}

impl LoanCalculator {
    pub fn new(policy: RoundingPolicy, currency: Currency) -> Self {
        Self {
            policy,
            currency,
            state: CalculatorState::Idle,
        }
    }

    pub fn recompute(
        &mut self,
        principal: Money,
        periodic_rate: Rate,
        period_count: Decimal,
    ) -> &CalculatorState {
        self.state = match LoanParameters::new(principal, periodic_rate, period_count)
            .and_then(|params| summarize(&params, self.policy, &self.currency, None))
        {
            Ok(summary) => CalculatorState::Computed(summary),
            Err(AmortizationError::InvalidInput { .. }) => CalculatorState::Idle,
            Err(e) => CalculatorState::Failed(e),
        };
        &self.state
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// The current summary, or `None` while awaiting valid input or after a failure.
    pub fn summary(&self) -> Option<&LoanSummary> {
        match &self.state {
            CalculatorState::Computed(summary) => Some(summary),
            _ => None,
        }
    }
}
