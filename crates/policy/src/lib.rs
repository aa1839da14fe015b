//! Faucet Claim Policy Engine
//!
//! Decides whether an account may claim right now and, when it may, mints
//! the fixed claim amount through the ledger and records the claim.
//!
//! ## Flow
//!
//! ```text
//! claim(account, now)
//!   │
//!   ├── lock account          (claims for one account are serialized)
//!   ├── status(record, now)   AllowanceExhausted / Cooling → reject
//!   ├── ledger.mint(issuer)   failure → reject, record untouched
//!   └── commit record         last_claim_at = now, total_claimed += amount
//! ```
//!
//! ## Key Components
//!
//! - [`config::FaucetConfig`] - Claim amount, cooldown, cap, token metadata
//! - [`state::ClaimRecord`] - Per-account claim history and derived status
//! - [`engine::ClaimEngine`] - Queries and the atomic claim operation
//! - [`bootstrap::bootstrap`] - One-shot genesis wiring of ledger and engine

pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod error;
pub mod receipt;
pub mod state;
pub mod view;

pub use bootstrap::{bootstrap, bootstrap_with_ledger};
pub use config::{ClaimPolicy, FaucetConfig};
pub use engine::ClaimEngine;
pub use error::{ClaimError, ClaimResult};
pub use receipt::ClaimReceipt;
pub use state::{ClaimRecord, ClaimState, ClaimStatus, RemainingAllowance};
pub use view::{format_cooldown, AccountView};
