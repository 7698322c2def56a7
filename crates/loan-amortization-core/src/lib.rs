pub mod error;
pub mod loan;
pub mod types;

#[cfg(feature = "emi")]
pub mod emi;

#[cfg(feature = "mortgage")]
pub mod mortgage;

pub use error::AmortizationError;
pub use loan::{amortize, compute_loan_summary, LoanInput, LoanSummary};
pub use types::*;

/// Standard result type for all amortization operations
pub type AmortizationResult<T> = Result<T, AmortizationError>;
