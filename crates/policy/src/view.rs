//! Read model for the display client

use faucet_core::{Address, Amount, Timestamp};
use serde::{Deserialize, Serialize};

use crate::state::{ClaimStatus, RemainingAllowance};

/// Everything a display client shows for one account, read consistently
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub account: Address,
    pub balance: Amount,
    pub status: ClaimStatus,
    pub can_claim: bool,
    pub remaining_allowance: RemainingAllowance,
    pub remaining_cooldown_secs: u64,
    /// `remaining_cooldown_secs` as `"{h}h {m}m {s}s"`, absent when zero
    pub cooldown_display: Option<String>,
    pub last_claim_at: Option<Timestamp>,
    pub next_claim_at: Option<Timestamp>,
    pub total_claimed: Amount,
    pub claim_count: u64,
}

/// Render a cooldown as hours, minutes and seconds
///
/// ```
/// use faucet_policy::format_cooldown;
///
/// assert_eq!(format_cooldown(86_399), "23h 59m 59s");
/// ```
pub fn format_cooldown(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h}h {m}m {s}s")
}
