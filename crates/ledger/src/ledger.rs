//! Balance ledger
//!
//! Holds per-account balances of the single issued token. Minting is the
//! only way balances change, and only the issuer bound at genesis may mint.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use faucet_core::{Address, Amount, TokenMetadata};

use crate::error::{ChainError, LedgerError, LedgerResult};
use crate::journal::{verify_chain, MintRecord, GENESIS_HASH};

/// Mutable ledger state, guarded as one unit
#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<Address, Amount>,
    total_supply: Amount,
    journal: Vec<MintRecord>,
}

/// Balance Ledger
///
/// Created empty with [`BalanceLedger::new`], then bound to its issuer
/// exactly once with [`BalanceLedger::initialize`]. Safe to share across
/// threads: `mint` holds the write lock for its whole check-and-update,
/// queries take the read lock.
#[derive(Debug)]
pub struct BalanceLedger {
    token: TokenMetadata,
    issuer: OnceLock<Address>,
    state: RwLock<LedgerState>,
}

impl BalanceLedger {
    /// Create a ledger with no issuer bound
    pub fn new(token: TokenMetadata) -> Self {
        Self {
            token,
            issuer: OnceLock::new(),
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// Create a ledger and bind its issuer in one step
    pub fn with_issuer(token: TokenMetadata, issuer: Address) -> Self {
        let ledger = Self::new(token);
        // A fresh OnceLock always accepts its first value.
        let _ = ledger.issuer.set(issuer);
        ledger
    }

    /// Bind the sole authorized minter.
    ///
    /// Fails with `AlreadyInitialized` on any call after the first; the
    /// original issuer stays bound.
    pub fn initialize(&self, issuer: Address) -> LedgerResult<()> {
        match self.issuer.set(issuer) {
            Ok(()) => {
                tracing::info!(issuer = %issuer, token = %self.token.symbol, "Ledger initialized");
                Ok(())
            }
            Err(_) => {
                let bound = self.issuer().unwrap_or(issuer);
                tracing::warn!(
                    issuer = %bound,
                    attempted = %issuer,
                    "Rejected second ledger initialization"
                );
                Err(LedgerError::AlreadyInitialized { issuer: bound })
            }
        }
    }

    /// The bound issuer, if genesis has happened
    pub fn issuer(&self) -> Option<Address> {
        self.issuer.get().copied()
    }

    pub fn is_initialized(&self) -> bool {
        self.issuer.get().is_some()
    }

    pub fn token(&self) -> &TokenMetadata {
        &self.token
    }

    /// Credit `amount` to `to`.
    ///
    /// Only the bound issuer may mint. The new balance and total supply are
    /// both computed with checked arithmetic before either is written, so a
    /// failed mint leaves the ledger untouched.
    pub fn mint(&self, caller: Address, to: Address, amount: Amount) -> LedgerResult<MintRecord> {
        let issuer = self.issuer().ok_or(LedgerError::NotInitialized)?;
        if caller != issuer {
            tracing::warn!(caller = %caller, to = %to, amount = %amount, "Unauthorized mint attempt");
            return Err(LedgerError::Unauthorized { caller, issuer });
        }

        self.token
            .check_precision(amount)
            .map_err(|e| LedgerError::InvalidAmount(e.to_string()))?;

        let mut state = self.write_state();

        let current = state.balances.get(&to).copied().unwrap_or_default();
        let balance_after = current
            .checked_add(&amount)
            .ok_or(LedgerError::Overflow { account: to })?;
        let total_supply_after = state
            .total_supply
            .checked_add(&amount)
            .ok_or(LedgerError::Overflow { account: to })?;

        let prev_hash = state
            .journal
            .last()
            .map(|r| r.hash.clone())
            .unwrap_or_else(|| GENESIS_HASH.to_string());
        let record = MintRecord::seal(
            state.journal.len() as u64 + 1,
            prev_hash,
            caller,
            to,
            amount,
            balance_after,
            total_supply_after,
        );

        state.balances.insert(to, balance_after);
        state.total_supply = total_supply_after;
        state.journal.push(record.clone());

        tracing::info!(
            to = %to,
            amount = %amount,
            balance = %balance_after,
            sequence = record.sequence,
            "Minted"
        );

        Ok(record)
    }

    /// Balance of an account (zero if never credited)
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.read_state()
            .balances
            .get(account)
            .copied()
            .unwrap_or_default()
    }

    /// Sum of every mint ever committed
    pub fn total_supply(&self) -> Amount {
        self.read_state().total_supply
    }

    /// Number of accounts ever credited
    pub fn holder_count(&self) -> usize {
        self.read_state().balances.len()
    }

    /// Copy of the mint journal
    pub fn journal(&self) -> Vec<MintRecord> {
        self.read_state().journal.clone()
    }

    /// Re-verify the journal hash chain
    pub fn verify_journal(&self) -> Result<(), ChainError> {
        verify_chain(&self.read_state().journal)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
