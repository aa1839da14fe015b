//! Faucet Ledger - Balance ledger with a single authorized issuer
//!
//! Every balance change goes through this crate, and every balance change is
//! a mint by the issuer bound at genesis. The ledger applies no business
//! rules of its own: whoever holds the issuer address may mint.
//!
//! # Key Types
//! - `BalanceLedger`: Per-account balances, total supply, mint journal
//! - `MintRecord`: Journal entry for one committed mint
//! - `LedgerError`: Authorization, overflow and bootstrap failures

pub mod error;
pub mod journal;
pub mod ledger;

pub use error::{ChainError, LedgerError, LedgerResult};
pub use journal::{calculate_record_hash, verify_chain, MintRecord, GENESIS_HASH};
pub use ledger::BalanceLedger;
