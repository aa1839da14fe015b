//! Token metadata - name, symbol and precision of the issued token
//!
//! The faucet issues a single fungible token. Its precision bounds every
//! amount the ledger accepts: an amount with more fractional digits than
//! `decimals` cannot be represented in base units and is rejected.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::amount::Amount;

/// Maximum precision a `Decimal` can carry
pub const MAX_DECIMALS: u8 = 28;

/// Errors in token metadata or token amounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Empty token symbol")]
    EmptySymbol,

    #[error("Token symbol too long (max 10 chars): {0}")]
    SymbolTooLong(String),

    #[error("Invalid token symbol format: {0}")]
    InvalidSymbol(String),

    #[error("Token name cannot be empty")]
    EmptyName,

    #[error("Token decimals {0} exceed maximum of 28")]
    TooManyDecimals(u8),

    #[error("Amount {amount} has more than {decimals} fractional digits")]
    ExcessPrecision { amount: Decimal, decimals: u8 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Descriptive metadata of the issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Fractional digits of one whole token
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_name() -> String {
    "Faucet Token".to_string()
}

fn default_symbol() -> String {
    "FCT".to_string()
}

fn default_decimals() -> u8 {
    18
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
        }
    }
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Validate name, symbol and precision
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.name.trim().is_empty() {
            return Err(TokenError::EmptyName);
        }

        let symbol = self.symbol.trim();
        if symbol.is_empty() {
            return Err(TokenError::EmptySymbol);
        }
        if symbol.len() > 10 {
            return Err(TokenError::SymbolTooLong(symbol.to_string()));
        }
        if !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TokenError::InvalidSymbol(symbol.to_string()));
        }

        if self.decimals > MAX_DECIMALS {
            return Err(TokenError::TooManyDecimals(self.decimals));
        }

        Ok(())
    }

    /// Reject amounts finer than the token's precision
    pub fn check_precision(&self, amount: Amount) -> Result<(), TokenError> {
        if amount.scale() > u32::from(self.decimals) {
            return Err(TokenError::ExcessPrecision {
                amount: amount.value(),
                decimals: self.decimals,
            });
        }
        Ok(())
    }

    /// Parse a human-readable amount such as `"100"` or `"0.25"`
    ///
    /// # Example
    /// ```
    /// use faucet_core::{Amount, TokenMetadata};
    ///
    /// let token = TokenMetadata::default();
    /// assert_eq!(token.parse_units("100").unwrap(), Amount::from_whole(100));
    /// assert!(token.parse_units("-1").is_err());
    /// ```
    pub fn parse_units(&self, s: &str) -> Result<Amount, TokenError> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| TokenError::InvalidAmount(format!("{s}: {e}")))?;
        let amount = Amount::new(value).map_err(|e| TokenError::InvalidAmount(e.to_string()))?;
        self.check_precision(amount)?;
        Ok(amount)
    }
}
