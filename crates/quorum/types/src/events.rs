use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::payload::TargetId;
use crate::signer::SignerId;

/// Notifications emitted by the wallet after each committed mutation.
///
/// Delivery is fire-and-forget; no engine logic depends on a subscriber
/// observing any of these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletEvent {
    OwnerAdded {
        owner: SignerId,
    },
    OwnerRemoved {
        owner: SignerId,
    },
    ThresholdChanged {
        new_threshold: usize,
    },
    TransactionSubmitted {
        index: u64,
        target: TargetId,
        value: u64,
        submitted_by: SignerId,
    },
    TransactionConfirmed {
        index: u64,
        owner: SignerId,
    },
    ConfirmationRevoked {
        index: u64,
        owner: SignerId,
    },
    TransactionExecuted {
        index: u64,
        reference: String,
    },
    Deposit {
        sender: SignerId,
        amount: u64,
        balance: u64,
    },
    VoteCountUpdated {
        owner: SignerId,
        count: u64,
    },
}

/// Envelope stamped onto every emitted event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletEventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: WalletEvent,
}

impl WalletEventEnvelope {
    pub fn new(event: WalletEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelopes_get_unique_ids() {
        let a = WalletEventEnvelope::new(WalletEvent::ThresholdChanged { new_threshold: 2 });
        let b = WalletEventEnvelope::new(WalletEvent::ThresholdChanged { new_threshold: 2 });
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn event_serialization_roundtrip() {
        let event = WalletEvent::TransactionSubmitted {
            index: 0,
            target: TargetId::new("recipient"),
            value: 7,
            submitted_by: SignerId::ephemeral(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let restored: WalletEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, restored);
    }
}
