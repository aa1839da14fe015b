//! Faucet configuration
//!
//! Policy constants are read once at bootstrap and are immutable afterwards.
//! Every field has a default so partial JSON files work.

use chrono::Duration;
use faucet_core::{Amount, TokenMetadata};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ClaimError, ClaimResult};

/// Raw configuration as loaded from file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaucetConfig {
    /// Issued token (name, symbol, precision)
    #[serde(default)]
    pub token: TokenMetadata,

    /// Amount minted per successful claim, in whole tokens
    #[serde(default = "default_claim_amount")]
    pub claim_amount: Decimal,

    /// Minimum seconds between two claims by one account
    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: u64,

    /// Lifetime ceiling on an account's claimed total (none = unlimited)
    #[serde(default)]
    pub allowance_cap: Option<Decimal>,
}

fn default_claim_amount() -> Decimal {
    Decimal::new(100, 0)
}

fn default_cooldown_seconds() -> u64 {
    86_400 // 24 hours
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            token: TokenMetadata::default(),
            claim_amount: default_claim_amount(),
            cooldown_seconds: default_cooldown_seconds(),
            allowance_cap: None,
        }
    }
}

/// Validated, typed policy constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimPolicy {
    pub claim_amount: Amount,
    pub cooldown_secs: u64,
    pub allowance_cap: Option<Amount>,
}

impl ClaimPolicy {
    /// Cooldown as a chrono Duration, saturating at `Duration::MAX`
    pub fn cooldown(&self) -> Duration {
        i64::try_from(self.cooldown_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

impl FaucetConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> ClaimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_claim_amount(mut self, amount: Decimal) -> Self {
        self.claim_amount = amount;
        self
    }

    pub fn with_cooldown_seconds(mut self, secs: u64) -> Self {
        self.cooldown_seconds = secs;
        self
    }

    pub fn with_allowance_cap(mut self, cap: Decimal) -> Self {
        self.allowance_cap = Some(cap);
        self
    }

    /// Validate and convert into typed policy constants
    pub fn policy(&self) -> ClaimResult<ClaimPolicy> {
        self.token
            .validate()
            .map_err(|e| ClaimError::Configuration(format!("token: {e}")))?;

        let claim_amount = self.typed_amount("claim_amount", self.claim_amount)?;
        if claim_amount.is_zero() {
            return Err(ClaimError::Configuration(
                "claim_amount must be greater than zero".to_string(),
            ));
        }

        let cooldown = i64::try_from(self.cooldown_seconds)
            .ok()
            .and_then(Duration::try_seconds);
        if cooldown.is_none() {
            return Err(ClaimError::Configuration(format!(
                "cooldown_seconds out of range: {}",
                self.cooldown_seconds
            )));
        }

        let allowance_cap = match self.allowance_cap {
            Some(cap) => {
                let cap = self.typed_amount("allowance_cap", cap)?;
                if cap < claim_amount {
                    return Err(ClaimError::Configuration(format!(
                        "allowance_cap {cap} is below claim_amount {claim_amount}"
                    )));
                }
                Some(cap)
            }
            None => None,
        };

        Ok(ClaimPolicy {
            claim_amount,
            cooldown_secs: self.cooldown_seconds,
            allowance_cap,
        })
    }

    fn typed_amount(&self, field: &str, value: Decimal) -> ClaimResult<Amount> {
        let amount =
            Amount::new(value).map_err(|e| ClaimError::Configuration(format!("{field}: {e}")))?;
        self.token
            .check_precision(amount)
            .map_err(|e| ClaimError::Configuration(format!("{field}: {e}")))?;
        Ok(amount)
    }
}
