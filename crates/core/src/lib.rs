//! Faucet Core - Domain types
//!
//! This crate contains the fundamental types shared by the ledger and the
//! claim policy engine:
//! - `Amount`: Non-negative decimal wrapper for token amounts
//! - `Address`: Fixed-width account identifier
//! - `TokenMetadata`: Name, symbol and precision of the issued token
//! - `Timestamp`: Externally supplied wall-clock reading

pub mod address;
pub mod amount;
pub mod time;
pub mod token;

pub use address::{Address, AddressError};
pub use amount::{Amount, AmountError};
pub use time::Timestamp;
pub use token::{TokenError, TokenMetadata};
