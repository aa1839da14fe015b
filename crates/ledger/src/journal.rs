//! Mint journal - append-only, hash-chained record of every mint
//!
//! Each record commits to its predecessor through `prev_hash`, so the full
//! issuance history can be audited without trusting the balance map.

use faucet_core::{Address, Amount};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ChainError;

/// `prev_hash` of the first record
pub const GENESIS_HASH: &str = "GENESIS";

/// One committed mint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRecord {
    /// Position in the journal, starting at 1
    pub sequence: u64,
    pub prev_hash: String,
    pub hash: String,
    /// Caller that performed the mint (always the issuer)
    pub minter: Address,
    pub to: Address,
    pub amount: Amount,
    pub balance_after: Amount,
    pub total_supply_after: Amount,
}

impl MintRecord {
    /// Build a record and seal it with its hash
    pub(crate) fn seal(
        sequence: u64,
        prev_hash: String,
        minter: Address,
        to: Address,
        amount: Amount,
        balance_after: Amount,
        total_supply_after: Amount,
    ) -> Self {
        let mut record = Self {
            sequence,
            prev_hash,
            hash: String::new(),
            minter,
            to,
            amount,
            balance_after,
            total_supply_after,
        };
        record.hash = calculate_record_hash(&record);
        record
    }
}

/// Calculate SHA256 hash of record content (excluding the hash field itself)
pub fn calculate_record_hash(record: &MintRecord) -> String {
    let mut hasher = Sha256::new();

    hasher.update(record.sequence.to_le_bytes());
    update_framed(&mut hasher, record.prev_hash.as_bytes());
    hasher.update(record.minter.as_bytes());
    hasher.update(record.to.as_bytes());
    update_framed(&mut hasher, record.amount.to_string().as_bytes());
    update_framed(&mut hasher, record.balance_after.to_string().as_bytes());
    update_framed(&mut hasher, record.total_supply_after.to_string().as_bytes());

    hex::encode(hasher.finalize())
}

/// Variable-length field, prefixed with its byte length
fn update_framed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// Verify hash chain integrity
pub fn verify_chain(records: &[MintRecord]) -> Result<(), ChainError> {
    let mut prev_hash = GENESIS_HASH.to_string();

    for (i, record) in records.iter().enumerate() {
        let expected_sequence = i as u64 + 1;
        if record.sequence != expected_sequence {
            return Err(ChainError::InvalidSequence {
                expected: expected_sequence,
                actual: record.sequence,
            });
        }

        if record.prev_hash != prev_hash {
            return Err(ChainError::BrokenLink {
                sequence: record.sequence,
                expected: prev_hash,
                actual: record.prev_hash.clone(),
            });
        }

        let calculated = calculate_record_hash(record);
        if record.hash != calculated {
            return Err(ChainError::InvalidHash {
                sequence: record.sequence,
                expected: calculated,
                actual: record.hash.clone(),
            });
        }

        prev_hash = record.hash.clone();
    }

    Ok(())
}
