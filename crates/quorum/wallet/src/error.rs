use thiserror::Error;

/// Errors returned by wallet mutating calls and queries.
///
/// Every error aborts the whole call with no partial state change; retries
/// are a caller concern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("caller is not a current owner")]
    Unauthorized,

    #[error("invalid owner: {0}")]
    InvalidOwner(String),

    #[error("invalid threshold {requested}: must be between 1 and {owner_count}")]
    InvalidThreshold {
        requested: usize,
        owner_count: usize,
    },

    #[error("removing this owner would leave {remaining} owners below threshold {threshold}")]
    ThresholdViolation { remaining: usize, threshold: usize },

    #[error("transaction index {0} is out of range")]
    InvalidIndex(u64),

    #[error("transaction {0} has already been executed")]
    AlreadyExecuted(u64),

    #[error("transaction {index} is already confirmed by {owner}")]
    AlreadyConfirmed { index: u64, owner: String },

    #[error("transaction {index} holds no confirmation from {owner}")]
    NotConfirmed { index: u64, owner: String },

    #[error("transaction {index} has {confirmations} of {required} required confirmations")]
    InsufficientConfirmations {
        index: u64,
        confirmations: usize,
        required: usize,
    },

    #[error("external effect failed: {0}")]
    ExternalEffectFailed(#[from] EffectError),

    #[error("wallet state lock poisoned")]
    StatePoisoned,
}

/// Failures reported by the external effect executor. Any of these aborts
/// the whole `execute` call and leaves the transaction executable for retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EffectError {
    #[error("insufficient funds: balance {balance} is below requested {requested}")]
    InsufficientFunds { balance: u64, requested: u64 },

    #[error("target rejected the call: {0}")]
    Rejected(String),

    #[error("effect backend failure: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_error_converts_into_wallet_error() {
        let err: WalletError = EffectError::Rejected("no receiver".into()).into();
        assert!(matches!(err, WalletError::ExternalEffectFailed(_)));
        assert!(err.to_string().contains("no receiver"));
    }

    #[test]
    fn insufficient_confirmations_display() {
        let err = WalletError::InsufficientConfirmations {
            index: 3,
            confirmations: 1,
            required: 2,
        };
        assert!(err.to_string().contains("1 of 2"));
    }
}
