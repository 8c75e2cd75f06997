use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::payload::{CallPayload, TargetId};
use crate::signer::SignerId;

/// One signer's standing confirmation on a ledger entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub signer: SignerId,
    pub confirmed_at: DateTime<Utc>,
}

/// A ledger entry: one proposed action and its confirmation state.
///
/// Entries are append-only. They are never deleted, only flagged executed,
/// which keeps the full proposal history available as an audit trail.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Dense zero-based position in the ledger, assigned at submission,
    /// immutable afterwards.
    pub index: u64,
    pub target: TargetId,
    /// Native-asset amount forwarded to the target on execution.
    pub value: u64,
    pub payload: CallPayload,
    /// Which signers have confirmed, and when. Entries of since-removed
    /// owners are retained for the audit trail; effective counts are always
    /// taken against the current registry.
    pub confirmations: Vec<Confirmation>,
    /// Monotonic false→true, never reset after a committed execution.
    pub executed: bool,
    pub submitted_by: SignerId,
    pub submitted_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(
        index: u64,
        target: TargetId,
        value: u64,
        payload: CallPayload,
        submitted_by: SignerId,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            index,
            target,
            value,
            payload,
            confirmations: Vec::new(),
            executed: false,
            submitted_by,
            submitted_at,
        }
    }

    /// True if the signer currently holds a confirmation on this entry.
    pub fn has_confirmation(&self, signer: &SignerId) -> bool {
        self.confirmations.iter().any(|c| c.signer == *signer)
    }

    /// Record a confirmation. Returns false if the signer already holds one.
    pub fn record_confirmation(&mut self, signer: SignerId, confirmed_at: DateTime<Utc>) -> bool {
        if self.has_confirmation(&signer) {
            return false;
        }
        self.confirmations.push(Confirmation {
            signer,
            confirmed_at,
        });
        true
    }

    /// Withdraw a confirmation. Returns false if the signer held none.
    pub fn clear_confirmation(&mut self, signer: &SignerId) -> bool {
        let before = self.confirmations.len();
        self.confirmations.retain(|c| c.signer != *signer);
        self.confirmations.len() != before
    }

    /// Raw number of recorded confirmations, including any from
    /// since-removed owners.
    pub fn raw_confirmation_count(&self) -> usize {
        self.confirmations.len()
    }

    /// Derive the lifecycle state from an effective confirmation count and
    /// the current threshold.
    pub fn status(&self, effective_confirmations: usize, threshold: usize) -> TransactionStatus {
        if self.executed {
            TransactionStatus::Executed
        } else if effective_confirmations >= threshold {
            TransactionStatus::Executable
        } else if effective_confirmations > 0 {
            TransactionStatus::PartiallyConfirmed
        } else {
            TransactionStatus::Proposed
        }
    }
}

/// Lifecycle states of a ledger entry. `Executed` is terminal; revocation
/// moves an entry back toward `Proposed`, never out of `Executed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Proposed,
    PartiallyConfirmed,
    Executable,
    Executed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TransactionRecord {
        TransactionRecord::new(
            0,
            TargetId::new("recipient"),
            10,
            CallPayload::Empty,
            SignerId::ephemeral(),
            Utc::now(),
        )
    }

    #[test]
    fn new_record_starts_unexecuted_and_unconfirmed() {
        let record = record();
        assert!(!record.executed);
        assert_eq!(record.raw_confirmation_count(), 0);
        assert_eq!(record.status(0, 2), TransactionStatus::Proposed);
    }

    #[test]
    fn status_follows_effective_count() {
        let mut record = record();
        assert_eq!(record.status(1, 2), TransactionStatus::PartiallyConfirmed);
        assert_eq!(record.status(2, 2), TransactionStatus::Executable);
        assert_eq!(record.status(3, 2), TransactionStatus::Executable);
        record.executed = true;
        assert_eq!(record.status(3, 2), TransactionStatus::Executed);
    }

    #[test]
    fn record_confirmation_rejects_duplicates() {
        let mut record = record();
        let signer = SignerId::ephemeral();
        assert!(record.record_confirmation(signer.clone(), Utc::now()));
        assert!(!record.record_confirmation(signer.clone(), Utc::now()));
        assert_eq!(record.raw_confirmation_count(), 1);
        assert!(record.has_confirmation(&signer));
    }

    #[test]
    fn clear_confirmation_reports_membership() {
        let mut record = record();
        let signer = SignerId::ephemeral();
        assert!(!record.clear_confirmation(&signer));
        record.record_confirmation(signer.clone(), Utc::now());
        assert!(record.clear_confirmation(&signer));
        assert_eq!(record.raw_confirmation_count(), 0);
    }

    #[test]
    fn serialization_roundtrip() {
        let mut record = record();
        record.record_confirmation(SignerId::ephemeral(), Utc::now());
        let json = serde_json::to_string(&record).unwrap();
        let restored: TransactionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.index, record.index);
        assert_eq!(restored.raw_confirmation_count(), 1);
    }
}
