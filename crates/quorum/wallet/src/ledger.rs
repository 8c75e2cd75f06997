use chrono::{DateTime, Utc};
use quorum_types::{CallPayload, SignerId, TargetId, TransactionRecord};
use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::registry::OwnerRegistry;

/// Append-only list of proposed transactions with per-entry confirmation
/// sets. Indices are dense, zero-based, and never reused.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransactionLedger {
    entries: Vec<TransactionRecord>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entry and return its index.
    pub fn submit(
        &mut self,
        submitted_by: SignerId,
        target: TargetId,
        value: u64,
        payload: CallPayload,
        submitted_at: DateTime<Utc>,
    ) -> u64 {
        let index = self.entries.len() as u64;
        self.entries.push(TransactionRecord::new(
            index,
            target,
            value,
            payload,
            submitted_by,
            submitted_at,
        ));
        index
    }

    /// Record one owner's confirmation on a pending entry.
    pub fn confirm(
        &mut self,
        owner: &SignerId,
        index: u64,
        confirmed_at: DateTime<Utc>,
    ) -> Result<(), WalletError> {
        let entry = self.entry_mut(index)?;
        if entry.executed {
            return Err(WalletError::AlreadyExecuted(index));
        }
        if !entry.record_confirmation(owner.clone(), confirmed_at) {
            return Err(WalletError::AlreadyConfirmed {
                index,
                owner: owner.to_string(),
            });
        }
        Ok(())
    }

    /// Withdraw one owner's confirmation from a pending entry.
    pub fn revoke(&mut self, owner: &SignerId, index: u64) -> Result<(), WalletError> {
        let entry = self.entry_mut(index)?;
        if entry.executed {
            return Err(WalletError::AlreadyExecuted(index));
        }
        if !entry.clear_confirmation(owner) {
            return Err(WalletError::NotConfirmed {
                index,
                owner: owner.to_string(),
            });
        }
        Ok(())
    }

    pub fn entry(&self, index: u64) -> Result<&TransactionRecord, WalletError> {
        self.entries
            .get(index as usize)
            .ok_or(WalletError::InvalidIndex(index))
    }

    pub(crate) fn entry_mut(&mut self, index: u64) -> Result<&mut TransactionRecord, WalletError> {
        self.entries
            .get_mut(index as usize)
            .ok_or(WalletError::InvalidIndex(index))
    }

    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TransactionRecord] {
        &self.entries
    }

    /// True if the owner holds a standing confirmation on the entry.
    pub fn is_confirmed_by(&self, index: u64, owner: &SignerId) -> Result<bool, WalletError> {
        Ok(self.entry(index)?.has_confirmation(owner))
    }

    /// Number of standing confirmations held by *current* owners.
    ///
    /// Confirmations recorded by since-removed owners stay in the entry for
    /// the audit trail but are discounted here, so the count tracks the
    /// registry as it changes between confirm and execute.
    pub fn effective_confirmations(
        &self,
        index: u64,
        registry: &OwnerRegistry,
    ) -> Result<usize, WalletError> {
        let entry = self.entry(index)?;
        Ok(entry
            .confirmations
            .iter()
            .filter(|c| registry.is_owner(&c.signer))
            .count())
    }
}
