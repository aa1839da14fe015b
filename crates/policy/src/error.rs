//! Claim errors

use faucet_core::{Address, Amount};
use faucet_ledger::LedgerError;
use thiserror::Error;

use crate::view::format_cooldown;

/// Errors from the Claim Policy Engine
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Cooldown active: {} remaining", cooldown_text(.remaining_secs))]
    CooldownActive { remaining_secs: u64 },

    #[error("Allowance cap reached: claimed {total_claimed} of {cap}")]
    AllowanceCapReached { total_claimed: Amount, cap: Amount },

    #[error("Claim total overflow for {account}")]
    Overflow { account: Address },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ClaimError {
    /// Map a ledger error raised during genesis wiring
    pub fn from_bootstrap(err: LedgerError) -> Self {
        if err.is_configuration() {
            ClaimError::Configuration(err.to_string())
        } else {
            ClaimError::Ledger(err)
        }
    }

    /// The same claim may succeed if retried later
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClaimError::CooldownActive { .. })
    }

    /// The request can never succeed for this caller/account
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClaimError::AllowanceCapReached { .. }
                | ClaimError::Ledger(LedgerError::Unauthorized { .. })
        )
    }

    /// Overflow from either the claim totals or the ledger
    pub fn is_overflow(&self) -> bool {
        matches!(
            self,
            ClaimError::Overflow { .. } | ClaimError::Ledger(LedgerError::Overflow { .. })
        )
    }

    /// Seconds until the account may claim again, for cooldown rejections
    pub fn remaining_cooldown(&self) -> Option<u64> {
        match self {
            ClaimError::CooldownActive { remaining_secs } => Some(*remaining_secs),
            _ => None,
        }
    }
}

fn cooldown_text(remaining_secs: &u64) -> String {
    format_cooldown(*remaining_secs)
}

/// Result type for claim operations
pub type ClaimResult<T> = Result<T, ClaimError>;
