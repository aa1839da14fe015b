//! Per-account claim history and the status derived from it
//!
//! Status is never stored. It is recomputed from a `ClaimRecord`, the
//! policy constants and the caller-supplied time on every query.

use std::collections::HashMap;

use faucet_core::time::elapsed_secs;
use faucet_core::{Address, Amount, Timestamp};
use serde::{Deserialize, Serialize};

use crate::config::ClaimPolicy;

/// Claim history of one account
///
/// An account with no record behaves exactly like `ClaimRecord::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Time of the most recent successful claim
    pub last_claim_at: Option<Timestamp>,
    /// Cumulative amount ever claimed
    pub total_claimed: Amount,
    /// Number of successful claims
    pub claim_count: u64,
}

/// Derived claim state of an account at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ClaimStatus {
    /// No successful claim yet
    NeverClaimed,
    /// Claimed recently; must wait
    Cooling { remaining_secs: u64 },
    /// Cooldown elapsed; may claim
    Eligible,
    /// Next claim would exceed the allowance cap (terminal)
    AllowanceExhausted,
}

impl ClaimStatus {
    pub fn is_claimable(&self) -> bool {
        matches!(self, ClaimStatus::NeverClaimed | ClaimStatus::Eligible)
    }
}

/// How much more an account may ever claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum RemainingAllowance {
    Unlimited,
    Limited(Amount),
}

impl RemainingAllowance {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, RemainingAllowance::Unlimited)
    }
}

impl ClaimRecord {
    pub fn has_claimed(&self) -> bool {
        self.last_claim_at.is_some()
    }

    /// Seconds left before the next claim, zero if never claimed.
    ///
    /// A clock reading earlier than `last_claim_at` counts as zero elapsed
    /// time, so the full cooldown remains.
    pub fn remaining_cooldown(&self, policy: &ClaimPolicy, now: Timestamp) -> u64 {
        match self.last_claim_at {
            Some(last) => policy.cooldown_secs.saturating_sub(elapsed_secs(last, now)),
            None => 0,
        }
    }

    /// Earliest time the cooldown allows another claim
    pub fn next_claim_at(&self, policy: &ClaimPolicy) -> Option<Timestamp> {
        let last = self.last_claim_at?;
        last.checked_add_signed(policy.cooldown())
    }

    /// Whether one more claim would push `total_claimed` past `cap`
    pub fn would_exceed(&self, cap: Amount, claim_amount: Amount) -> bool {
        match self.total_claimed.checked_add(&claim_amount) {
            Some(next) => next > cap,
            None => true,
        }
    }

    pub fn remaining_allowance(&self, policy: &ClaimPolicy) -> RemainingAllowance {
        match policy.allowance_cap {
            Some(cap) => RemainingAllowance::Limited(cap.saturating_sub(&self.total_claimed)),
            None => RemainingAllowance::Unlimited,
        }
    }

    /// Derive the claim status. Exhaustion outranks cooldown.
    pub fn status(&self, policy: &ClaimPolicy, now: Timestamp) -> ClaimStatus {
        if let Some(cap) = policy.allowance_cap {
            if self.would_exceed(cap, policy.claim_amount) {
                return ClaimStatus::AllowanceExhausted;
            }
        }

        if !self.has_claimed() {
            return ClaimStatus::NeverClaimed;
        }

        match self.remaining_cooldown(policy, now) {
            0 => ClaimStatus::Eligible,
            remaining_secs => ClaimStatus::Cooling { remaining_secs },
        }
    }

    /// The record after one more successful claim of `amount` at `now`.
    ///
    /// Returns None if the running total would overflow. `last_claim_at`
    /// never moves backward.
    pub fn after_claim(&self, amount: Amount, now: Timestamp) -> Option<ClaimRecord> {
        let total_claimed = self.total_claimed.checked_add(&amount)?;
        let last_claim_at = match self.last_claim_at {
            Some(last) => last.max(now),
            None => now,
        };

        Some(ClaimRecord {
            last_claim_at: Some(last_claim_at),
            total_claimed,
            claim_count: self.claim_count.checked_add(1)?,
        })
    }
}

/// Claim records of all accounts
#[derive(Debug, Default)]
pub struct ClaimState {
    records: HashMap<Address, ClaimRecord>,
}

impl ClaimState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of an account's record (default if never claimed)
    pub fn record(&self, account: &Address) -> ClaimRecord {
        self.records.get(account).cloned().unwrap_or_default()
    }

    /// Replace an account's record after a committed claim
    pub fn commit(&mut self, account: Address, record: ClaimRecord) {
        self.records.insert(account, record);
    }

    /// Number of accounts that have claimed at least once
    pub fn account_count(&self) -> usize {
        self.records.len()
    }
}
