//! Custom error types for cash-envelope
//!
//! This module defines the error hierarchy for the ledger using thiserror.
//! Domain failures (bad deposits, short withdrawals, broken percentages) get
//! their own variants so callers can report an accurate reason without
//! string matching.

use thiserror::Error;

use crate::models::{Denomination, DenominationVector, Money};

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Unknown denomination key, or a negative or oversized count, in an incoming map
    #[error("Invalid denomination: {0}")]
    InvalidDenomination(String),

    /// The owner has no account that takes part in distribution
    #[error("No accounts available to distribute the deposit")]
    NoAccounts,

    /// Distribution needs exactly one remainder account
    #[error("Exactly one remainder account is required, found {found}")]
    MissingRemainderAccount { found: usize },

    /// Negative percentage or percentages adding up to more than 100
    #[error("Invalid percentage: {0}")]
    InvalidPercentage(String),

    /// Deposit with no cash in it
    #[error("Deposit is empty")]
    EmptyDeposit,

    /// Deposit does not cover the reserved recurring expenses
    #[error("Deposit of {deposit} does not cover expenses of {expenses}: short by {shortfall}")]
    InsufficientDeposit {
        deposit: Money,
        expenses: Money,
        shortfall: Money,
    },

    /// Withdrawal could not be fully produced from physical cash
    #[error("Not enough cash in '{account}': missing {unsatisfied}")]
    InsufficientCash {
        account: String,
        unsatisfied: DenominationVector,
    },

    /// A denomination count would have gone below zero
    #[error("Negative count for {denomination}: have {available}, removing {requested}")]
    NegativeCount {
        denomination: Denomination,
        available: u64,
        requested: u64,
    },

    /// Ledger state violates one of its own invariants
    #[error("Ledger invariant violated: {0}")]
    Invariant(String),

    /// A mutation failed part-way; the transaction was rolled back
    #[error("Operation rolled back: {0}")]
    ApplyFailed(#[source] Box<LedgerError>),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl LedgerError {
    /// Create a "not found" error for owners
    pub fn owner_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Owner",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for sub-accounts
    pub fn sub_account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Sub-account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for recurring expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Wrap an error raised while mutating inside a transaction.
    ///
    /// Errors that are already wrapped are passed through unchanged.
    pub fn rolled_back(err: LedgerError) -> Self {
        match err {
            wrapped @ Self::ApplyFailed(_) => wrapped,
            other => Self::ApplyFailed(Box::new(other)),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidDenomination(_)
                | Self::InvalidPercentage(_)
                | Self::EmptyDeposit
                | Self::NoAccounts
                | Self::MissingRemainderAccount { .. }
                | Self::InsufficientDeposit { .. }
        )
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for LedgerError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::account_not_found("Ahorro");
        assert_eq!(err.to_string(), "Account not found: Ahorro");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_insufficient_deposit_error() {
        let err = LedgerError::InsufficientDeposit {
            deposit: Money::from_cents(1000),
            expenses: Money::from_cents(1500),
            shortfall: Money::from_cents(500),
        };
        assert_eq!(
            err.to_string(),
            "Deposit of $10.00 does not cover expenses of $15.00: short by $5.00"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_insufficient_cash_names_missing_notes() {
        let mut missing = DenominationVector::new();
        missing.add_count(Denomination::Twenty, 1);
        let err = LedgerError::InsufficientCash {
            account: "Principal".into(),
            unsatisfied: missing,
        };
        assert_eq!(err.to_string(), "Not enough cash in 'Principal': missing 1x20");
    }

    #[test]
    fn test_rolled_back_wraps_once() {
        let err = LedgerError::rolled_back(LedgerError::Storage("disk full".into()));
        let twice = LedgerError::rolled_back(err);
        match twice {
            LedgerError::ApplyFailed(inner) => {
                assert!(matches!(*inner, LedgerError::Storage(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LedgerError = io_err.into();
        assert!(matches!(err, LedgerError::Io(_)));
    }
}
