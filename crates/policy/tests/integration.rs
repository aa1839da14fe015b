//! Integration tests for bootstrap + ledger + claim policy flow

use std::sync::{Arc, Barrier};
use std::thread;

use rust_decimal_macros::dec;

use faucet_core::time::from_unix;
use faucet_core::{Address, Amount};
use faucet_ledger::{BalanceLedger, LedgerError};
use faucet_policy::{
    bootstrap, bootstrap_with_ledger, ClaimEngine, ClaimError, ClaimStatus, FaucetConfig,
    RemainingAllowance,
};

const COOLDOWN: i64 = 86_400;

fn issuer() -> Address {
    Address::from_low_u64(0xF0)
}

fn account(n: u64) -> Address {
    Address::from_low_u64(0x1000 + n)
}

fn create_engine(config: FaucetConfig) -> ClaimEngine {
    bootstrap(&config, issuer()).expect("bootstrap")
}

#[test]
fn test_never_claimed_accounts_are_eligible() {
    let engine = create_engine(FaucetConfig::default());

    for n in 0..5 {
        let now = from_unix(n as i64 * 1_000);
        assert!(engine.can_claim(&account(n), now));
        assert_eq!(engine.remaining_cooldown(&account(n), now), 0);
        assert_eq!(engine.status(&account(n), now), ClaimStatus::NeverClaimed);
        assert_eq!(engine.balance_of(&account(n)), Amount::ZERO);
    }
}

#[test]
fn test_cooldown_window_is_half_open() {
    let engine = create_engine(FaucetConfig::default());
    let t = 1_700_000_000;
    engine.claim(account(1), from_unix(t)).unwrap();

    for offset in [0, 1, 3_600, COOLDOWN - 1] {
        assert!(
            !engine.can_claim(&account(1), from_unix(t + offset)),
            "should be cooling at +{offset}s"
        );
    }
    assert!(engine.can_claim(&account(1), from_unix(t + COOLDOWN)));
    assert_eq!(engine.status(&account(1), from_unix(t + COOLDOWN)), ClaimStatus::Eligible);
}

#[test]
fn test_daily_claim_scenario() {
    let engine = create_engine(FaucetConfig::default());
    let x = account(42);

    engine.claim(x, from_unix(0)).unwrap();
    assert_eq!(engine.balance_of(&x), Amount::from_whole(100));
    assert_eq!(engine.last_claim_at(&x), Some(from_unix(0)));

    let err = engine.claim(x, from_unix(86_399)).unwrap_err();
    assert!(matches!(err, ClaimError::CooldownActive { remaining_secs: 1 }));
    assert!(err.is_retryable());
    assert_eq!(engine.remaining_cooldown(&x, from_unix(86_399)), 1);

    engine.claim(x, from_unix(86_400)).unwrap();
    assert_eq!(engine.balance_of(&x), Amount::from_whole(200));
}

#[test]
fn test_total_claimed_matches_balance() {
    let engine = create_engine(FaucetConfig::default());
    let x = account(7);

    for n in 0..5 {
        engine.claim(x, from_unix(n * COOLDOWN)).unwrap();
    }

    assert_eq!(engine.claim_count(&x), 5);
    assert_eq!(engine.total_claimed(&x), Amount::from_whole(500));
    assert_eq!(engine.balance_of(&x), engine.total_claimed(&x));
    assert_eq!(engine.ledger().total_supply(), Amount::from_whole(500));
}

#[test]
fn test_allowance_cap_scenario() {
    let engine = create_engine(FaucetConfig::default().with_allowance_cap(dec!(250)));
    let x = account(3);

    engine.claim(x, from_unix(0)).unwrap();
    assert_eq!(engine.total_claimed(&x), Amount::from_whole(100));

    engine.claim(x, from_unix(COOLDOWN)).unwrap();
    assert_eq!(engine.total_claimed(&x), Amount::from_whole(200));
    assert_eq!(
        engine.remaining_allowance(&x),
        RemainingAllowance::Limited(Amount::from_whole(50))
    );

    let later = from_unix(10 * COOLDOWN);
    assert_eq!(engine.status(&x, later), ClaimStatus::AllowanceExhausted);
    let err = engine.claim(x, later).unwrap_err();
    assert!(matches!(
        err,
        ClaimError::AllowanceCapReached { total_claimed, cap }
            if total_claimed == Amount::from_whole(200) && cap == Amount::from_whole(250)
    ));
    assert!(err.is_terminal());
    assert_eq!(engine.balance_of(&x), Amount::from_whole(200));
}

#[test]
fn test_unlimited_allowance() {
    let engine = create_engine(FaucetConfig::default());
    assert!(engine.remaining_allowance(&account(1)).is_unlimited());
}

#[test]
fn test_mint_from_non_issuer_rejected() {
    let engine = create_engine(FaucetConfig::default());
    let intruder = account(99);

    let result = engine
        .ledger()
        .mint(intruder, intruder, Amount::from_whole(1_000));

    assert!(matches!(result, Err(LedgerError::Unauthorized { .. })));
    assert_eq!(engine.balance_of(&intruder), Amount::ZERO);
    assert_eq!(engine.ledger().total_supply(), Amount::ZERO);
}

#[test]
fn test_rebootstrap_keeps_issuer() {
    let config = FaucetConfig::default();
    let ledger = Arc::new(BalanceLedger::new(config.token.clone()));
    let engine = bootstrap_with_ledger(&config, Arc::clone(&ledger), issuer()).unwrap();

    let err = bootstrap_with_ledger(&config, Arc::clone(&ledger), account(1)).unwrap_err();

    assert!(matches!(err, ClaimError::Configuration(_)));
    assert_eq!(ledger.issuer(), Some(issuer()));

    // The original engine still mints.
    engine.claim(account(2), from_unix(0)).unwrap();
    assert_eq!(ledger.balance_of(&account(2)), Amount::from_whole(100));
}

#[test]
fn test_concurrent_claims_same_account_mint_once() {
    const THREADS: usize = 8;

    let engine = Arc::new(create_engine(FaucetConfig::default()));
    let x = account(5);
    let now = from_unix(1_000);
    assert!(engine.can_claim(&x, now));

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                engine.claim(x, now)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("claim thread panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let cooling = results
        .iter()
        .filter(|r| matches!(r, Err(ClaimError::CooldownActive { .. })))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(cooling, THREADS - 1);
    assert_eq!(engine.balance_of(&x), Amount::from_whole(100));
    assert_eq!(engine.ledger().journal().len(), 1);
}

#[test]
fn test_concurrent_claims_distinct_accounts_all_succeed() {
    const THREADS: u64 = 8;

    let engine = Arc::new(create_engine(FaucetConfig::default()));
    let barrier = Arc::new(Barrier::new(THREADS as usize));

    let handles: Vec<_> = (0..THREADS)
        .map(|n| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                engine.claim(account(n), from_unix(0))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().expect("claim thread panicked").is_ok());
    }

    assert_eq!(engine.claimant_count(), THREADS as usize);
    assert_eq!(engine.ledger().total_supply(), Amount::from_whole(100 * THREADS));
    engine.ledger().verify_journal().unwrap();
}

#[test]
fn test_backward_clock_treated_as_cooling() {
    let engine = create_engine(FaucetConfig::default());
    let x = account(8);
    engine.claim(x, from_unix(10_000)).unwrap();

    let err = engine.claim(x, from_unix(5_000)).unwrap_err();

    assert!(matches!(
        err,
        ClaimError::CooldownActive {
            remaining_secs: 86_400
        }
    ));
    assert_eq!(engine.last_claim_at(&x), Some(from_unix(10_000)));
}

#[test]
fn test_config_file_bootstrap() -> anyhow::Result<()> {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        r#"{{ "claim_amount": "2.5", "cooldown_seconds": 60, "allowance_cap": "5" }}"#
    )?;

    let config = FaucetConfig::from_file(file.path())?;
    let engine = bootstrap(&config, issuer())?;
    let x = account(1);

    engine.claim(x, from_unix(0))?;
    engine.claim(x, from_unix(60))?;
    assert_eq!(engine.balance_of(&x), Amount::new(dec!(5))?);
    assert!(matches!(
        engine.claim(x, from_unix(120)),
        Err(ClaimError::AllowanceCapReached { .. })
    ));
    Ok(())
}

#[test]
fn test_receipt_serializes_for_display() {
    let engine = create_engine(FaucetConfig::default());
    let receipt = engine.claim(account(1), from_unix(0)).unwrap();

    let json = serde_json::to_value(&receipt).unwrap();

    assert_eq!(json["amount"], "100");
    assert_eq!(json["mint_sequence"], 1);
    assert!(json["id"].as_str().is_some_and(|id| !id.is_empty()));
}
