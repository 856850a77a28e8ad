//! Ledger error types

use thiserror::Error;

/// Rejected input. The operation that raised it changed nothing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is not a valid national id")]
    InvalidNationalId(String),

    #[error("text is required")]
    MissingText,

    #[error("You can't deposit negative amounts (got {0})")]
    NegativeDeposit(f64),

    #[error("You can't withdraw negative amounts (got {0})")]
    NegativeWithdrawal(f64),

    #[error("Journal entries have to have an amount larger than one cent (got {0})")]
    NearZeroAmount(f64),

    #[error("Amount must be a finite number (got {0})")]
    NonFiniteAmount(f64),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BankError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A customer with this national id is already registered
    #[error("Customer already exists: {0}")]
    DuplicateCustomer(String),
}

impl BankError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateCustomer(_))
    }
}
