//! Deterministic multi-owner authorization engine.
//!
//! This crate provides:
//! - an owner registry with threshold invariants on every mutation
//! - an append-only transaction ledger with per-entry confirmation sets
//! - the confirmation state machine (Proposed → Executable → Executed)
//! - the execution gate: a single authoritative `can_execute` predicate and
//!   an exactly-once `execute` with all-or-nothing external-effect semantics
//!
//! All mutating operations on a wallet instance serialize on one write lock;
//! every call either fully commits or fully rolls back. Read queries observe
//! the last committed state.

#![deny(unsafe_code)]

pub mod error;
pub mod events;
pub mod gate;
pub mod ledger;
pub mod registry;
pub mod traits;
pub mod vault;
pub mod votes;
pub mod wallet;

pub use error::{EffectError, WalletError};
pub use events::WalletEventBus;
pub use ledger::TransactionLedger;
pub use registry::OwnerRegistry;
pub use traits::{BalanceSource, EffectExecutor, EffectReceipt};
pub use vault::InMemoryVault;
pub use votes::VoteBook;
pub use wallet::{MultisigWallet, ENGINE_VERSION};

// Re-export the shared data model for downstream consumers.
pub use quorum_types as types;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quorum_types::{CallPayload, SignerId, TargetId};

    use super::{InMemoryVault, MultisigWallet};

    #[test]
    fn crate_api_builds_a_working_wallet() {
        let vault = Arc::new(InMemoryVault::with_balance(10));
        let owners = vec![SignerId::ephemeral(), SignerId::ephemeral()];
        let wallet =
            MultisigWallet::new(owners.clone(), 2, vault.clone(), vault.clone()).unwrap();

        let index = wallet
            .submit(&owners[0], TargetId::new("r"), 1, CallPayload::Empty)
            .unwrap();
        wallet.confirm(&owners[0], index).unwrap();
        wallet.confirm(&owners[1], index).unwrap();
        assert!(wallet.can_execute(index).unwrap());

        wallet.execute(&owners[1], index).unwrap();
        assert_eq!(wallet.get_balance(), 9);
    }
}
