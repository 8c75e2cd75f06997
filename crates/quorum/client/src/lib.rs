//! Client-facing read projections over the wallet engine.
//!
//! Application state is explicit here: a client holds a wallet handle,
//! pulls consistent snapshots on demand, and subscribes to the event stream
//! for refresh cues. Nothing is cached ambiently; a stale view is always
//! the caller's own copy, never hidden engine state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use quorum_types::{
    CallPayload, SignerId, TargetId, TransactionStatus, WalletEventEnvelope,
};
use quorum_wallet::{MultisigWallet, WalletError};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Point-in-time projection of wallet-level state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub owners: Vec<SignerId>,
    pub threshold: usize,
    pub transaction_count: u64,
    pub balance: u64,
    pub version: u32,
}

/// One ledger entry as the front end renders it: the record plus the
/// derived quantities the engine would otherwise recompute per widget.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionView {
    pub index: u64,
    pub target: TargetId,
    pub value: u64,
    pub payload: CallPayload,
    pub confirmations: usize,
    pub required: usize,
    pub executed: bool,
    pub can_execute: bool,
    pub status: TransactionStatus,
    pub submitted_by: SignerId,
    pub submitted_at: DateTime<Utc>,
}

/// Read-only client over a shared wallet instance.
pub struct WalletClient {
    wallet: Arc<MultisigWallet>,
}

impl WalletClient {
    pub fn new(wallet: Arc<MultisigWallet>) -> Self {
        Self { wallet }
    }

    /// Pull a fresh wallet-level snapshot.
    pub fn snapshot(&self) -> Result<WalletSnapshot, WalletError> {
        Ok(WalletSnapshot {
            owners: self.wallet.owners()?,
            threshold: self.wallet.threshold()?,
            transaction_count: self.wallet.transaction_count()?,
            balance: self.wallet.get_balance(),
            version: self.wallet.version(),
        })
    }

    /// Project one ledger entry.
    pub fn transaction(&self, index: u64) -> Result<TransactionView, WalletError> {
        let record = self.wallet.transaction(index)?;
        let confirmations = self.wallet.confirmation_count(index)?;
        let required = self.wallet.threshold()?;
        Ok(TransactionView {
            index: record.index,
            can_execute: self.wallet.can_execute(index)?,
            status: record.status(confirmations, required),
            confirmations,
            required,
            executed: record.executed,
            target: record.target,
            value: record.value,
            payload: record.payload,
            submitted_by: record.submitted_by,
            submitted_at: record.submitted_at,
        })
    }

    /// Project the whole ledger, newest last.
    pub fn transactions(&self) -> Result<Vec<TransactionView>, WalletError> {
        let count = self.wallet.transaction_count()?;
        (0..count).map(|index| self.transaction(index)).collect()
    }

    /// Subscribe to committed-mutation notifications. The intended loop is
    /// subscribe, then re-pull snapshots whenever an event arrives.
    pub fn subscribe(&self) -> broadcast::Receiver<WalletEventEnvelope> {
        self.wallet.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use quorum_types::WalletEvent;
    use quorum_wallet::InMemoryVault;

    use super::*;

    fn client() -> (WalletClient, Vec<SignerId>) {
        let owners = vec![
            SignerId::ephemeral(),
            SignerId::ephemeral(),
            SignerId::ephemeral(),
        ];
        let vault = Arc::new(InMemoryVault::with_balance(5));
        let wallet =
            Arc::new(MultisigWallet::new(owners.clone(), 2, vault.clone(), vault).unwrap());
        (WalletClient::new(wallet.clone()), owners)
    }

    #[test]
    fn snapshot_reflects_committed_state() {
        let (client, owners) = client();
        let before = client.snapshot().unwrap();
        assert_eq!(before.owners, owners);
        assert_eq!(before.threshold, 2);
        assert_eq!(before.transaction_count, 0);
        assert_eq!(before.balance, 5);

        client
            .wallet
            .submit(&owners[0], TargetId::new("r"), 1, CallPayload::Empty)
            .unwrap();
        let after = client.snapshot().unwrap();
        assert_eq!(after.transaction_count, 1);
    }

    #[test]
    fn transaction_view_carries_derived_fields() {
        let (client, owners) = client();
        let index = client
            .wallet
            .submit(&owners[0], TargetId::new("r"), 1, CallPayload::Empty)
            .unwrap();
        client.wallet.confirm(&owners[0], index).unwrap();

        let view = client.transaction(index).unwrap();
        assert_eq!(view.confirmations, 1);
        assert_eq!(view.required, 2);
        assert!(!view.can_execute);
        assert_eq!(view.status, TransactionStatus::PartiallyConfirmed);

        client.wallet.confirm(&owners[1], index).unwrap();
        let view = client.transaction(index).unwrap();
        assert!(view.can_execute);
        assert_eq!(view.status, TransactionStatus::Executable);
    }

    #[test]
    fn transactions_lists_every_entry_in_order() {
        let (client, owners) = client();
        for value in 1..=3 {
            client
                .wallet
                .submit(&owners[0], TargetId::new("r"), value, CallPayload::Empty)
                .unwrap();
        }
        let views = client.transactions().unwrap();
        assert_eq!(views.len(), 3);
        for (position, view) in views.iter().enumerate() {
            assert_eq!(view.index, position as u64);
        }
    }

    #[test]
    fn unknown_index_propagates() {
        let (client, _) = client();
        assert!(matches!(
            client.transaction(0),
            Err(WalletError::InvalidIndex(0))
        ));
    }

    #[tokio::test]
    async fn subscribe_then_refresh_contract() {
        let (client, owners) = client();
        let mut rx = client.subscribe();

        client
            .wallet
            .submit(&owners[0], TargetId::new("r"), 1, CallPayload::Empty)
            .unwrap();

        let envelope = rx.recv().await.unwrap();
        assert!(matches!(
            envelope.event,
            WalletEvent::TransactionSubmitted { index: 0, .. }
        ));
        // The event is the cue; the snapshot is the state.
        assert_eq!(client.snapshot().unwrap().transaction_count, 1);
    }

    #[test]
    fn view_serializes_for_transport() {
        let (client, owners) = client();
        let index = client
            .wallet
            .submit(&owners[0], TargetId::new("r"), 1, CallPayload::Empty)
            .unwrap();
        let view = client.transaction(index).unwrap();
        let json = serde_json::to_string(&view).unwrap();
        let restored: TransactionView = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.index, view.index);
        assert_eq!(restored.status, view.status);
    }
}
