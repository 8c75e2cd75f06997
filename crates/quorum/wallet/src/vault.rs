use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use quorum_types::{CallPayload, TargetId};

use crate::error::EffectError;
use crate::traits::{BalanceSource, EffectExecutor, EffectReceipt};

/// In-memory holding account used for tests, local demos, and embedding.
///
/// Plays both boundary roles: it answers balance queries and settles
/// executed transactions by debiting itself. A transfer larger than the
/// held balance fails the effect, which leaves the transaction executable
/// for retry once the vault is funded.
#[derive(Debug, Default)]
pub struct InMemoryVault {
    funds: AtomicU64,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(funds: u64) -> Self {
        Self {
            funds: AtomicU64::new(funds),
        }
    }

    fn debit(&self, amount: u64) -> Result<u64, EffectError> {
        let mut current = self.funds.load(Ordering::Acquire);
        loop {
            let remaining =
                current
                    .checked_sub(amount)
                    .ok_or(EffectError::InsufficientFunds {
                        balance: current,
                        requested: amount,
                    })?;
            match self.funds.compare_exchange(
                current,
                remaining,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(remaining),
                Err(observed) => current = observed,
            }
        }
    }
}

impl EffectExecutor for InMemoryVault {
    fn execute(
        &self,
        target: &TargetId,
        value: u64,
        _payload: &CallPayload,
    ) -> Result<EffectReceipt, EffectError> {
        self.debit(value)?;
        Ok(EffectReceipt {
            reference: format!("vault:{}:{}", target.0, uuid::Uuid::new_v4()),
            settled_at: Utc::now(),
        })
    }
}

impl BalanceSource for InMemoryVault {
    fn balance(&self) -> u64 {
        self.funds.load(Ordering::Acquire)
    }

    fn deposit(&self, amount: u64) -> u64 {
        self.funds.fetch_add(amount, Ordering::AcqRel) + amount
    }
}
