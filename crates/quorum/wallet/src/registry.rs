use quorum_types::SignerId;
use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// The set of authorized owners and the confirmation threshold.
///
/// Invariant after every mutation: the owner list is non-empty, free of
/// duplicates and placeholder ids, and `1 <= threshold <= |owners|`.
/// Owner order is preserved for display only; authorization is membership.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OwnerRegistry {
    owners: Vec<SignerId>,
    threshold: usize,
}

impl OwnerRegistry {
    pub fn new(owners: Vec<SignerId>, threshold: usize) -> Result<Self, WalletError> {
        if owners.is_empty() {
            return Err(WalletError::InvalidOwner("owner set is empty".into()));
        }
        for (position, owner) in owners.iter().enumerate() {
            if owner.is_zero() {
                return Err(WalletError::InvalidOwner(
                    "placeholder identity cannot be an owner".into(),
                ));
            }
            if owners[..position].contains(owner) {
                return Err(WalletError::InvalidOwner(format!(
                    "duplicate owner {owner}"
                )));
            }
        }
        if threshold < 1 || threshold > owners.len() {
            return Err(WalletError::InvalidThreshold {
                requested: threshold,
                owner_count: owners.len(),
            });
        }
        Ok(Self { owners, threshold })
    }

    pub fn is_owner(&self, id: &SignerId) -> bool {
        self.owners.contains(id)
    }

    pub fn owners(&self) -> &[SignerId] {
        &self.owners
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Admit a new owner. The threshold is left unchanged.
    pub fn add_owner(&mut self, candidate: SignerId) -> Result<(), WalletError> {
        if candidate.is_zero() {
            return Err(WalletError::InvalidOwner(
                "placeholder identity cannot be an owner".into(),
            ));
        }
        if self.is_owner(&candidate) {
            return Err(WalletError::InvalidOwner(format!(
                "{candidate} is already an owner"
            )));
        }
        self.owners.push(candidate);
        Ok(())
    }

    /// Remove a current owner. Fails if the remaining set would no longer
    /// cover the threshold.
    pub fn remove_owner(&mut self, target: &SignerId) -> Result<(), WalletError> {
        if !self.is_owner(target) {
            return Err(WalletError::InvalidOwner(format!(
                "{target} is not a current owner"
            )));
        }
        let remaining = self.owners.len() - 1;
        if remaining < self.threshold {
            return Err(WalletError::ThresholdViolation {
                remaining,
                threshold: self.threshold,
            });
        }
        self.owners.retain(|owner| owner != target);
        Ok(())
    }

    /// Replace the threshold atomically.
    pub fn change_threshold(&mut self, new_threshold: usize) -> Result<(), WalletError> {
        if new_threshold < 1 || new_threshold > self.owners.len() {
            return Err(WalletError::InvalidThreshold {
                requested: new_threshold,
                owner_count: self.owners.len(),
            });
        }
        self.threshold = new_threshold;
        Ok(())
    }
}
