//! Genesis wiring
//!
//! Binds the ledger's issuer and hands the same issuer to the claim engine.
//! Runs exactly once per ledger; a second run fails instead of rebinding.

use std::sync::Arc;

use faucet_core::Address;
use faucet_ledger::BalanceLedger;

use crate::config::FaucetConfig;
use crate::engine::ClaimEngine;
use crate::error::{ClaimError, ClaimResult};

/// Create a fresh ledger for `config.token` and wire an engine to it
pub fn bootstrap(config: &FaucetConfig, issuer: Address) -> ClaimResult<ClaimEngine> {
    let ledger = Arc::new(BalanceLedger::new(config.token.clone()));
    bootstrap_with_ledger(config, ledger, issuer)
}

/// Wire an engine to an existing, not yet initialized ledger.
///
/// Fails with `ClaimError::Configuration` if the config is invalid, the
/// issuer is the zero address, the ledger issues a different token, or the
/// ledger already has an issuer bound. In every failure case the ledger is
/// left as it was.
pub fn bootstrap_with_ledger(
    config: &FaucetConfig,
    ledger: Arc<BalanceLedger>,
    issuer: Address,
) -> ClaimResult<ClaimEngine> {
    let policy = config.policy()?;

    if issuer.is_zero() {
        return Err(ClaimError::Configuration(
            "issuer cannot be the zero address".to_string(),
        ));
    }

    if ledger.token() != &config.token {
        return Err(ClaimError::Configuration(format!(
            "ledger issues {} but config names {}",
            ledger.token().symbol,
            config.token.symbol
        )));
    }

    ledger.initialize(issuer).map_err(ClaimError::from_bootstrap)?;

    tracing::info!(
        issuer = %issuer,
        token = %config.token.symbol,
        claim_amount = %policy.claim_amount,
        cooldown_secs = policy.cooldown_secs,
        allowance_cap = ?policy.allowance_cap.map(|cap| cap.to_string()),
        "Faucet bootstrapped"
    );

    Ok(ClaimEngine::new(policy, ledger, issuer))
}
