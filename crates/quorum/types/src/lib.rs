//! Core type definitions for the quorum authorization engine.
//!
//! This crate provides the shared data model: signer identities, transaction
//! records, call payloads, and the wallet event vocabulary.

pub mod events;
pub mod payload;
pub mod signer;
pub mod transaction;

// Re-export primary types at crate root for ergonomic use.
pub use events::{WalletEvent, WalletEventEnvelope};
pub use payload::{CallPayload, TargetId};
pub use signer::{SignerId, SignerMaterial};
pub use transaction::{Confirmation, TransactionRecord, TransactionStatus};

#[cfg(test)]
mod tests {
    use super::SignerId;

    #[test]
    fn signer_id_is_available() {
        let _ = SignerId::ephemeral();
    }
}
