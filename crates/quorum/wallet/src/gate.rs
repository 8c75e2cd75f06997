use crate::error::WalletError;
use crate::ledger::TransactionLedger;
use crate::registry::OwnerRegistry;

/// The authoritative execution predicate: not yet executed, and the standing
/// confirmations of *current* owners cover the *current* threshold.
///
/// Threshold and owner-set changes between confirm and execute are honored
/// because the predicate is evaluated against live registry state, never
/// against counts captured at confirmation time.
pub fn can_execute(
    ledger: &TransactionLedger,
    registry: &OwnerRegistry,
    index: u64,
) -> Result<bool, WalletError> {
    let entry = ledger.entry(index)?;
    if entry.executed {
        return Ok(false);
    }
    let confirmations = ledger.effective_confirmations(index, registry)?;
    Ok(confirmations >= registry.threshold())
}

/// Gate check for `execute`: distinguishes the terminal state from a
/// still-pending entry so callers get the precise refusal kind.
pub(crate) fn require_executable(
    ledger: &TransactionLedger,
    registry: &OwnerRegistry,
    index: u64,
) -> Result<(), WalletError> {
    let entry = ledger.entry(index)?;
    if entry.executed {
        return Err(WalletError::AlreadyExecuted(index));
    }
    let confirmations = ledger.effective_confirmations(index, registry)?;
    let required = registry.threshold();
    if confirmations < required {
        return Err(WalletError::InsufficientConfirmations {
            index,
            confirmations,
            required,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use quorum_types::{CallPayload, SignerId, TargetId};

    use super::*;

    fn fixture() -> (Vec<SignerId>, OwnerRegistry, TransactionLedger, u64) {
        let owners = vec![
            SignerId::ephemeral(),
            SignerId::ephemeral(),
            SignerId::ephemeral(),
        ];
        let registry = OwnerRegistry::new(owners.clone(), 2).unwrap();
        let mut ledger = TransactionLedger::new();
        let index = ledger.submit(
            owners[0].clone(),
            TargetId::new("recipient"),
            1,
            CallPayload::Empty,
            Utc::now(),
        );
        (owners, registry, ledger, index)
    }

    #[test]
    fn predicate_flips_exactly_at_threshold() {
        let (owners, registry, mut ledger, index) = fixture();
        assert!(!can_execute(&ledger, &registry, index).unwrap());

        ledger.confirm(&owners[0], index, Utc::now()).unwrap();
        assert!(!can_execute(&ledger, &registry, index).unwrap());

        ledger.confirm(&owners[1], index, Utc::now()).unwrap();
        assert!(can_execute(&ledger, &registry, index).unwrap());
    }

    #[test]
    fn predicate_is_false_after_execution() {
        let (owners, registry, mut ledger, index) = fixture();
        ledger.confirm(&owners[0], index, Utc::now()).unwrap();
        ledger.confirm(&owners[1], index, Utc::now()).unwrap();
        ledger.entry_mut(index).unwrap().executed = true;
        assert!(!can_execute(&ledger, &registry, index).unwrap());
        assert!(matches!(
            require_executable(&ledger, &registry, index),
            Err(WalletError::AlreadyExecuted(_))
        ));
    }

    #[test]
    fn threshold_raise_is_honored_at_gate_time() {
        let (owners, mut registry, mut ledger, index) = fixture();
        ledger.confirm(&owners[0], index, Utc::now()).unwrap();
        ledger.confirm(&owners[1], index, Utc::now()).unwrap();
        assert!(can_execute(&ledger, &registry, index).unwrap());

        registry.change_threshold(3).unwrap();
        assert!(!can_execute(&ledger, &registry, index).unwrap());
        let err = require_executable(&ledger, &registry, index).unwrap_err();
        assert_eq!(
            err,
            WalletError::InsufficientConfirmations {
                index,
                confirmations: 2,
                required: 3,
            }
        );
    }

    #[test]
    fn owner_removal_is_honored_at_gate_time() {
        let (owners, mut registry, mut ledger, index) = fixture();
        ledger.confirm(&owners[0], index, Utc::now()).unwrap();
        ledger.confirm(&owners[1], index, Utc::now()).unwrap();
        registry.remove_owner(&owners[1]).unwrap();
        assert!(!can_execute(&ledger, &registry, index).unwrap());
    }

    #[test]
    fn missing_index_propagates() {
        let (_, registry, ledger, _) = fixture();
        assert!(matches!(
            can_execute(&ledger, &registry, 42),
            Err(WalletError::InvalidIndex(42))
        ));
    }
}
