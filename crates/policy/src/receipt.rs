//! Claim receipts
//!
//! Returned to the caller of a successful claim so a display client can
//! show what happened without issuing follow-up queries.

use faucet_core::{Address, Amount, Timestamp};
use serde::{Deserialize, Serialize};

/// Outcome of one successful claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    /// Unique receipt id
    pub id: String,
    pub account: Address,
    /// Amount minted by this claim
    pub amount: Amount,
    pub claimed_at: Timestamp,
    /// Account's claimed total including this claim
    pub total_claimed: Amount,
    /// Account's ledger balance right after the mint
    pub balance_after: Amount,
    /// Earliest time the cooldown allows the next claim
    pub next_eligible_at: Option<Timestamp>,
    /// Sequence of the mint in the ledger journal
    pub mint_sequence: u64,
}

impl ClaimReceipt {
    pub(crate) fn new(
        account: Address,
        amount: Amount,
        claimed_at: Timestamp,
        total_claimed: Amount,
        balance_after: Amount,
        next_eligible_at: Option<Timestamp>,
        mint_sequence: u64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            account,
            amount,
            claimed_at,
            total_claimed,
            balance_after,
            next_eligible_at,
            mint_sequence,
        }
    }
}
