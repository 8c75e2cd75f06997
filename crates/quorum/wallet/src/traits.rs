use chrono::{DateTime, Utc};
use quorum_types::{CallPayload, TargetId};
use serde::{Deserialize, Serialize};

use crate::error::EffectError;

/// External settlement boundary that actually performs a transaction's
/// action when it executes.
///
/// Invoked exactly once per successful `execute`, after the executed flag is
/// set; a failure aborts the whole call and rolls the flag back. The wallet
/// holds its write lock across the invocation, so implementations must not
/// call back into the wallet.
pub trait EffectExecutor: Send + Sync {
    fn execute(
        &self,
        target: &TargetId,
        value: u64,
        payload: &CallPayload,
    ) -> Result<EffectReceipt, EffectError>;
}

/// Read-through to the holding account's native-asset balance. The balance
/// is maintained by the settlement substrate, not by the engine.
pub trait BalanceSource: Send + Sync {
    fn balance(&self) -> u64;

    /// Credit incoming funds. Returns the new balance.
    fn deposit(&self, amount: u64) -> u64;
}

/// Proof of settlement returned by the effect executor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EffectReceipt {
    /// External settlement reference for the audit trail.
    pub reference: String,
    pub settled_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_serialization_roundtrip() {
        let receipt = EffectReceipt {
            reference: "settle-001".into(),
            settled_at: Utc::now(),
        };
        let json = serde_json::to_string(&receipt).unwrap();
        let restored: EffectReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.reference, "settle-001");
    }
}
