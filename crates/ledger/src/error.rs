//! Ledger errors

use faucet_core::Address;
use thiserror::Error;

/// Errors that can occur in ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Unauthorized mint by {caller}: only issuer {issuer} may mint")]
    Unauthorized { caller: Address, issuer: Address },

    #[error("Balance overflow crediting {account}")]
    Overflow { account: Address },

    #[error("Ledger already initialized with issuer {issuer}")]
    AlreadyInitialized { issuer: Address },

    #[error("Ledger has no issuer bound yet")]
    NotInitialized,

    #[error("Invalid mint amount: {0}")]
    InvalidAmount(String),
}

impl LedgerError {
    /// Bootstrap-time failures (double initialization, use before genesis)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LedgerError::AlreadyInitialized { .. } | LedgerError::NotInitialized
        )
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors in mint journal verification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Broken link at seq {sequence}: expected prev_hash '{expected}', got '{actual}'")]
    BrokenLink {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid hash at seq {sequence}: expected '{expected}', got '{actual}'")]
    InvalidHash {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid sequence: expected {expected}, got {actual}")]
    InvalidSequence { expected: u64, actual: u64 },
}
