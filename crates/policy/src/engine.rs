//! Claim Engine - Main orchestrator
//!
//! Evaluates claim eligibility, mints through the ledger and records the
//! claim. All time-dependent operations take `now` from the caller.

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::DashMap;
use faucet_core::{Address, Amount, Timestamp};
use faucet_ledger::BalanceLedger;

use crate::config::ClaimPolicy;
use crate::error::{ClaimError, ClaimResult};
use crate::receipt::ClaimReceipt;
use crate::state::{ClaimRecord, ClaimState, ClaimStatus, RemainingAllowance};
use crate::view::{format_cooldown, AccountView};

/// Main Claim Engine
///
/// Owns every account's claim record and mints through the shared ledger
/// as the bound issuer.
///
/// Claims for the same account are serialized by a per-account lock held
/// across check, mint and record update. Claims for different accounts only
/// contend on the ledger's own write lock for the duration of the mint.
/// A lock entry lives only while some caller holds it.
#[derive(Debug)]
pub struct ClaimEngine {
    policy: ClaimPolicy,
    issuer: Address,
    ledger: Arc<BalanceLedger>,
    state: RwLock<ClaimState>,
    account_locks: DashMap<Address, Arc<Mutex<()>>>,
}

impl ClaimEngine {
    /// Wire an engine to a ledger whose issuer is already bound.
    ///
    /// Only reachable through bootstrap.
    pub(crate) fn new(policy: ClaimPolicy, ledger: Arc<BalanceLedger>, issuer: Address) -> Self {
        Self {
            policy,
            issuer,
            ledger,
            state: RwLock::new(ClaimState::new()),
            account_locks: DashMap::new(),
        }
    }

    pub fn policy(&self) -> &ClaimPolicy {
        &self.policy
    }

    pub fn issuer(&self) -> Address {
        self.issuer
    }

    /// Shared ledger handle (for balance queries)
    pub fn ledger(&self) -> &Arc<BalanceLedger> {
        &self.ledger
    }

    // === Queries ===

    /// Snapshot of an account's claim record
    pub fn record(&self, account: &Address) -> ClaimRecord {
        self.read_state().record(account)
    }

    pub fn status(&self, account: &Address, now: Timestamp) -> ClaimStatus {
        self.record(account).status(&self.policy, now)
    }

    /// Whether a claim at `now` would pass the policy checks
    pub fn can_claim(&self, account: &Address, now: Timestamp) -> bool {
        self.status(account, now).is_claimable()
    }

    pub fn remaining_allowance(&self, account: &Address) -> RemainingAllowance {
        self.record(account).remaining_allowance(&self.policy)
    }

    /// Seconds until the cooldown elapses (0 if never claimed)
    pub fn remaining_cooldown(&self, account: &Address, now: Timestamp) -> u64 {
        self.record(account).remaining_cooldown(&self.policy, now)
    }

    pub fn last_claim_at(&self, account: &Address) -> Option<Timestamp> {
        self.record(account).last_claim_at
    }

    pub fn total_claimed(&self, account: &Address) -> Amount {
        self.record(account).total_claimed
    }

    pub fn claim_count(&self, account: &Address) -> u64 {
        self.record(account).claim_count
    }

    pub fn next_claim_at(&self, account: &Address) -> Option<Timestamp> {
        self.record(account).next_claim_at(&self.policy)
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.ledger.balance_of(account)
    }

    /// Number of accounts that have claimed at least once
    pub fn claimant_count(&self) -> usize {
        self.read_state().account_count()
    }

    /// All display fields for an account from one consistent read.
    ///
    /// Waits for an in-flight claim on the same account so balance and
    /// record never disagree.
    pub fn view(&self, account: &Address, now: Timestamp) -> AccountView {
        self.with_account_lock(*account, || self.read_view(account, now))
    }

    fn read_view(&self, account: &Address, now: Timestamp) -> AccountView {
        let record = self.record(account);
        let balance = self.ledger.balance_of(account);
        let status = record.status(&self.policy, now);
        let remaining_cooldown_secs = record.remaining_cooldown(&self.policy, now);

        AccountView {
            account: *account,
            balance,
            status,
            can_claim: status.is_claimable(),
            remaining_allowance: record.remaining_allowance(&self.policy),
            remaining_cooldown_secs,
            cooldown_display: (remaining_cooldown_secs > 0)
                .then(|| format_cooldown(remaining_cooldown_secs)),
            last_claim_at: record.last_claim_at,
            next_claim_at: record.next_claim_at(&self.policy),
            total_claimed: record.total_claimed,
            claim_count: record.claim_count,
        }
    }

    // === Claim ===

    /// Claim the fixed amount for `account` at `now`.
    ///
    /// Eligibility is re-evaluated here under the account lock; an earlier
    /// `can_claim` answer is never trusted. The record is updated only
    /// after the mint commits, so any failure leaves both the ledger and
    /// the record as they were.
    pub fn claim(&self, account: Address, now: Timestamp) -> ClaimResult<ClaimReceipt> {
        self.with_account_lock(account, || self.claim_locked(account, now))
    }

    fn claim_locked(&self, account: Address, now: Timestamp) -> ClaimResult<ClaimReceipt> {
        let record = self.record(&account);
        self.check(&account, &record, now)?;

        let amount = self.policy.claim_amount;
        let updated = record
            .after_claim(amount, now)
            .ok_or(ClaimError::Overflow { account })?;

        let mint = self.ledger.mint(self.issuer, account, amount)?;

        let next_eligible_at = updated.next_claim_at(&self.policy);
        let total_claimed = updated.total_claimed;
        self.write_state().commit(account, updated);

        tracing::info!(
            account = %account,
            amount = %amount,
            total_claimed = %total_claimed,
            sequence = mint.sequence,
            "Claim succeeded"
        );

        Ok(ClaimReceipt::new(
            account,
            amount,
            now,
            total_claimed,
            mint.balance_after,
            next_eligible_at,
            mint.sequence,
        ))
    }

    /// Policy checks for a claim at `now`; exhaustion is reported before cooldown
    fn check(&self, account: &Address, record: &ClaimRecord, now: Timestamp) -> ClaimResult<()> {
        if let Some(cap) = self.policy.allowance_cap {
            if record.would_exceed(cap, self.policy.claim_amount) {
                tracing::debug!(
                    account = %account,
                    total_claimed = %record.total_claimed,
                    cap = %cap,
                    "Claim rejected: allowance cap reached"
                );
                return Err(ClaimError::AllowanceCapReached {
                    total_claimed: record.total_claimed,
                    cap,
                });
            }
        }

        let remaining_secs = record.remaining_cooldown(&self.policy, now);
        if remaining_secs > 0 {
            tracing::debug!(
                account = %account,
                remaining_secs,
                "Claim rejected: cooldown active"
            );
            return Err(ClaimError::CooldownActive { remaining_secs });
        }

        Ok(())
    }

    /// Run `f` under the account's claim lock.
    ///
    /// The entry is created on demand and dropped again once no other
    /// caller holds a handle to it. Handles are only cloned under the
    /// shard lock, so a strong count of one means the map is the sole owner.
    fn with_account_lock<T>(&self, account: Address, f: impl FnOnce() -> T) -> T {
        let lock = Arc::clone(self.account_locks.entry(account).or_default().value());

        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        drop(lock);
        self.account_locks
            .remove_if(&account, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ClaimState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ClaimState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::bootstrap;
    use crate::config::FaucetConfig;
    use faucet_core::time::from_unix;
    use faucet_ledger::LedgerError;
    use rust_decimal_macros::dec;

    fn issuer() -> Address {
        Address::from_low_u64(0xF0)
    }

    fn user() -> Address {
        Address::from_low_u64(0x01)
    }

    fn create_engine(config: FaucetConfig) -> ClaimEngine {
        bootstrap(&config, issuer()).unwrap()
    }

    #[test]
    fn test_first_claim_succeeds() {
        let engine = create_engine(FaucetConfig::default());

        let receipt = engine.claim(user(), from_unix(0)).unwrap();

        assert_eq!(receipt.amount, Amount::from_whole(100));
        assert_eq!(receipt.total_claimed, Amount::from_whole(100));
        assert_eq!(receipt.balance_after, Amount::from_whole(100));
        assert_eq!(receipt.next_eligible_at, Some(from_unix(86_400)));
        assert_eq!(receipt.mint_sequence, 1);
        assert_eq!(engine.total_claimed(&user()), Amount::from_whole(100));
        assert_eq!(engine.last_claim_at(&user()), Some(from_unix(0)));
    }

    #[test]
    fn test_immediate_reclaim_rejected() {
        let engine = create_engine(FaucetConfig::default());
        engine.claim(user(), from_unix(0)).unwrap();

        let result = engine.claim(user(), from_unix(0));

        assert!(matches!(
            result,
            Err(ClaimError::CooldownActive {
                remaining_secs: 86_400
            })
        ));
        assert_eq!(engine.balance_of(&user()), Amount::from_whole(100));
        assert_eq!(engine.claim_count(&user()), 1);
    }

    #[test]
    fn test_cap_reached_before_cooldown_reported() {
        let engine = create_engine(FaucetConfig::default().with_allowance_cap(dec!(100)));
        engine.claim(user(), from_unix(0)).unwrap();

        let result = engine.claim(user(), from_unix(1));

        assert!(matches!(result, Err(ClaimError::AllowanceCapReached { .. })));
    }

    #[test]
    fn test_mint_overflow_leaves_record_untouched() {
        let engine = create_engine(FaucetConfig::default());
        engine
            .ledger()
            .mint(issuer(), user(), Amount::MAX)
            .unwrap();

        let result = engine.claim(user(), from_unix(0));

        assert!(matches!(
            result,
            Err(ClaimError::Ledger(LedgerError::Overflow { .. }))
        ));
        assert_eq!(engine.record(&user()), ClaimRecord::default());
        assert!(engine.can_claim(&user(), from_unix(0)));
        assert_eq!(engine.claimant_count(), 0);
    }

    #[test]
    fn test_claim_total_overflow_leaves_ledger_untouched() {
        let engine = create_engine(FaucetConfig::default());
        let seeded = ClaimRecord {
            last_claim_at: Some(from_unix(0)),
            total_claimed: Amount::MAX,
            claim_count: 1,
        };
        engine.write_state().commit(user(), seeded.clone());

        let result = engine.claim(user(), from_unix(86_400));

        assert!(matches!(
            result,
            Err(ClaimError::Overflow { account }) if account == user()
        ));
        assert_eq!(engine.record(&user()), seeded);
        assert_eq!(engine.balance_of(&user()), Amount::ZERO);
        assert_eq!(engine.ledger().total_supply(), Amount::ZERO);
        assert!(engine.ledger().journal().is_empty());
    }

    #[test]
    fn test_claim_that_would_lose_precision_is_rejected() {
        let config = FaucetConfig::default().with_claim_amount(dec!(0.000000000000000001));
        let engine = create_engine(config);
        let whole = Amount::from_whole(100_000_000_000);
        engine.ledger().mint(issuer(), user(), whole).unwrap();

        let result = engine.claim(user(), from_unix(0));

        assert!(result.is_err_and(|e| e.is_overflow()));
        assert_eq!(engine.balance_of(&user()), whole);
        assert_eq!(engine.total_claimed(&user()), Amount::ZERO);
        assert_eq!(engine.ledger().journal().len(), 1);
    }

    #[test]
    fn test_account_locks_released_after_use() {
        let engine = create_engine(FaucetConfig::default());

        for n in 0..1_000 {
            engine.view(&Address::from_low_u64(0x10_000 + n), from_unix(0));
        }
        engine.claim(user(), from_unix(0)).unwrap();
        assert!(engine.claim(user(), from_unix(1)).is_err());

        assert!(engine.account_locks.is_empty());
        assert_eq!(engine.claimant_count(), 1);
    }

    #[test]
    fn test_view_reports_cooldown() {
        let engine = create_engine(FaucetConfig::default().with_allowance_cap(dec!(1000)));
        engine.claim(user(), from_unix(0)).unwrap();

        let view = engine.view(&user(), from_unix(3_600));

        assert_eq!(view.balance, Amount::from_whole(100));
        assert!(!view.can_claim);
        assert_eq!(view.remaining_cooldown_secs, 82_800);
        assert_eq!(view.cooldown_display.as_deref(), Some("23h 0m 0s"));
        assert_eq!(
            view.remaining_allowance,
            RemainingAllowance::Limited(Amount::from_whole(900))
        );
        assert_eq!(view.next_claim_at, Some(from_unix(86_400)));
    }

    #[test]
    fn test_view_never_claimed() {
        let engine = create_engine(FaucetConfig::default());

        let view = engine.view(&user(), from_unix(0));

        assert_eq!(view.status, ClaimStatus::NeverClaimed);
        assert!(view.can_claim);
        assert_eq!(view.cooldown_display, None);
        assert!(view.remaining_allowance.is_unlimited());
    }
}
