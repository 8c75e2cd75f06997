use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use quorum_types::{
    CallPayload, SignerId, TargetId, TransactionRecord, WalletEvent, WalletEventEnvelope,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::WalletError;
use crate::events::WalletEventBus;
use crate::gate;
use crate::ledger::TransactionLedger;
use crate::registry::OwnerRegistry;
use crate::traits::{BalanceSource, EffectExecutor, EffectReceipt};
use crate::votes::VoteBook;

/// Engine revision reported by `version()`. Revision 2 carries the per-owner
/// vote counters on top of the base confirmation machine.
pub const ENGINE_VERSION: u32 = 2;

struct WalletState {
    registry: OwnerRegistry,
    ledger: TransactionLedger,
    votes: VoteBook,
}

/// The wallet engine: owner registry, transaction ledger, confirmation state
/// machine, and execution gate behind one mutual-exclusion domain.
///
/// Mutating calls serialize on the write lock and are atomic: they either
/// fully commit or leave no trace. Read queries take the read lock and
/// observe the last committed state. The caller identity is supplied by the
/// embedding application and trusted absolutely; signature verification
/// happens outside this engine.
pub struct MultisigWallet {
    state: RwLock<WalletState>,
    effects: Arc<dyn EffectExecutor>,
    funds: Arc<dyn BalanceSource>,
    events: WalletEventBus,
}

impl std::fmt::Debug for MultisigWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultisigWallet").finish_non_exhaustive()
    }
}

impl MultisigWallet {
    /// Deploy a wallet with the initial owner set and threshold.
    pub fn new(
        owners: Vec<SignerId>,
        threshold: usize,
        effects: Arc<dyn EffectExecutor>,
        funds: Arc<dyn BalanceSource>,
    ) -> Result<Self, WalletError> {
        let registry = OwnerRegistry::new(owners, threshold)?;
        info!(
            owners = registry.owner_count(),
            threshold = registry.threshold(),
            "multisig wallet deployed"
        );
        Ok(Self {
            state: RwLock::new(WalletState {
                registry,
                ledger: TransactionLedger::new(),
                votes: VoteBook::new(),
            }),
            effects,
            funds,
            events: WalletEventBus::new(),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, WalletState>, WalletError> {
        self.state.read().map_err(|_| WalletError::StatePoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, WalletState>, WalletError> {
        self.state.write().map_err(|_| WalletError::StatePoisoned)
    }

    fn authorize(state: &WalletState, caller: &SignerId) -> Result<(), WalletError> {
        if state.registry.is_owner(caller) {
            Ok(())
        } else {
            Err(WalletError::Unauthorized)
        }
    }

    // ── Owner registry ──────────────────────────────────────────────

    /// Admit a new owner. Any current owner may act; there is no super-admin.
    pub fn add_owner(&self, caller: &SignerId, candidate: SignerId) -> Result<(), WalletError> {
        let mut state = self.write()?;
        Self::authorize(&state, caller)?;
        state.registry.add_owner(candidate.clone())?;
        drop(state);

        info!(owner = %candidate, caller = %caller, "owner added");
        self.events.emit(WalletEvent::OwnerAdded { owner: candidate });
        Ok(())
    }

    /// Remove a current owner. Standing confirmations of the removed owner
    /// stay recorded on pending entries but stop counting toward thresholds.
    pub fn remove_owner(&self, caller: &SignerId, target: &SignerId) -> Result<(), WalletError> {
        let mut state = self.write()?;
        Self::authorize(&state, caller)?;
        state.registry.remove_owner(target)?;
        drop(state);

        info!(owner = %target, caller = %caller, "owner removed");
        self.events.emit(WalletEvent::OwnerRemoved {
            owner: target.clone(),
        });
        Ok(())
    }

    /// Replace the confirmation threshold atomically.
    pub fn change_threshold(
        &self,
        caller: &SignerId,
        new_threshold: usize,
    ) -> Result<(), WalletError> {
        let mut state = self.write()?;
        Self::authorize(&state, caller)?;
        state.registry.change_threshold(new_threshold)?;
        drop(state);

        info!(threshold = new_threshold, caller = %caller, "threshold changed");
        self.events
            .emit(WalletEvent::ThresholdChanged { new_threshold });
        Ok(())
    }

    // ── Transaction ledger ──────────────────────────────────────────

    /// Propose a transaction. Returns the assigned ledger index. The target,
    /// value, and payload are not validated here; the effect executor judges
    /// them at execution time.
    pub fn submit(
        &self,
        caller: &SignerId,
        target: TargetId,
        value: u64,
        payload: CallPayload,
    ) -> Result<u64, WalletError> {
        let mut state = self.write()?;
        Self::authorize(&state, caller)?;
        let index = state
            .ledger
            .submit(caller.clone(), target.clone(), value, payload, Utc::now());
        drop(state);

        debug!(index, target = %target, value, submitted_by = %caller, "transaction submitted");
        self.events.emit(WalletEvent::TransactionSubmitted {
            index,
            target,
            value,
            submitted_by: caller.clone(),
        });
        Ok(index)
    }

    /// Record the caller's confirmation on a pending transaction.
    pub fn confirm(&self, caller: &SignerId, index: u64) -> Result<(), WalletError> {
        let mut state = self.write()?;
        Self::authorize(&state, caller)?;
        state.ledger.confirm(caller, index, Utc::now())?;
        let vote_count = state.votes.record_confirmation(caller);
        drop(state);

        debug!(index, owner = %caller, vote_count, "transaction confirmed");
        self.events.emit(WalletEvent::TransactionConfirmed {
            index,
            owner: caller.clone(),
        });
        self.events.emit(WalletEvent::VoteCountUpdated {
            owner: caller.clone(),
            count: vote_count,
        });
        Ok(())
    }

    /// Withdraw the caller's confirmation from a pending transaction.
    pub fn revoke_confirmation(&self, caller: &SignerId, index: u64) -> Result<(), WalletError> {
        let mut state = self.write()?;
        Self::authorize(&state, caller)?;
        state.ledger.revoke(caller, index)?;
        let vote_count = state.votes.record_revocation(caller);
        drop(state);

        debug!(index, owner = %caller, vote_count, "confirmation revoked");
        self.events.emit(WalletEvent::ConfirmationRevoked {
            index,
            owner: caller.clone(),
        });
        self.events.emit(WalletEvent::VoteCountUpdated {
            owner: caller.clone(),
            count: vote_count,
        });
        Ok(())
    }

    // ── Execution gate ──────────────────────────────────────────────

    /// Execute a sufficiently-confirmed transaction. Any current owner may
    /// trigger execution, confirmer or not.
    ///
    /// The executed flag is set strictly before the external effect runs;
    /// if the effect fails, the flag is rolled back and the entry stays
    /// executable for retry. The write lock is held across the effect call,
    /// so no other mutation, including a duplicate execute, can interleave.
    pub fn execute(&self, caller: &SignerId, index: u64) -> Result<EffectReceipt, WalletError> {
        let mut state = self.write()?;
        Self::authorize(&state, caller)?;
        gate::require_executable(&state.ledger, &state.registry, index)?;

        let (target, value, payload) = {
            let entry = state.ledger.entry_mut(index)?;
            entry.executed = true;
            (entry.target.clone(), entry.value, entry.payload.clone())
        };

        match self.effects.execute(&target, value, &payload) {
            Ok(receipt) => {
                drop(state);
                info!(index, target = %target, value, reference = %receipt.reference,
                    "transaction executed");
                self.events.emit(WalletEvent::TransactionExecuted {
                    index,
                    reference: receipt.reference.clone(),
                });
                Ok(receipt)
            }
            Err(source) => {
                state.ledger.entry_mut(index)?.executed = false;
                drop(state);
                warn!(index, target = %target, value, error = %source,
                    "external effect failed; execution rolled back");
                Err(WalletError::ExternalEffectFailed(source))
            }
        }
    }

    /// The authoritative execution predicate, re-evaluated against live
    /// registry state on every call.
    pub fn can_execute(&self, index: u64) -> Result<bool, WalletError> {
        let state = self.read()?;
        gate::can_execute(&state.ledger, &state.registry, index)
    }

    // ── Vote counters ───────────────────────────────────────────────

    /// Manually bump an owner's vote counter (additive to the automatic
    /// coupling with confirm/revoke).
    pub fn increment_vote_count(
        &self,
        caller: &SignerId,
        owner: &SignerId,
    ) -> Result<u64, WalletError> {
        let mut state = self.write()?;
        Self::authorize(&state, caller)?;
        if !state.registry.is_owner(owner) {
            return Err(WalletError::InvalidOwner(format!(
                "{owner} is not a current owner"
            )));
        }
        let count = state.votes.increment(owner);
        drop(state);

        self.events.emit(WalletEvent::VoteCountUpdated {
            owner: owner.clone(),
            count,
        });
        Ok(count)
    }

    pub fn vote_count(&self, owner: &SignerId) -> Result<u64, WalletError> {
        Ok(self.read()?.votes.count(owner))
    }

    // ── Read API ────────────────────────────────────────────────────

    pub fn owners(&self) -> Result<Vec<SignerId>, WalletError> {
        Ok(self.read()?.registry.owners().to_vec())
    }

    pub fn owner_count(&self) -> Result<usize, WalletError> {
        Ok(self.read()?.registry.owner_count())
    }

    pub fn is_owner(&self, id: &SignerId) -> Result<bool, WalletError> {
        Ok(self.read()?.registry.is_owner(id))
    }

    pub fn threshold(&self) -> Result<usize, WalletError> {
        Ok(self.read()?.registry.threshold())
    }

    pub fn transaction_count(&self) -> Result<u64, WalletError> {
        Ok(self.read()?.ledger.len())
    }

    pub fn transaction(&self, index: u64) -> Result<TransactionRecord, WalletError> {
        Ok(self.read()?.ledger.entry(index)?.clone())
    }

    pub fn is_transaction_confirmed(
        &self,
        index: u64,
        owner: &SignerId,
    ) -> Result<bool, WalletError> {
        self.read()?.ledger.is_confirmed_by(index, owner)
    }

    /// Number of standing confirmations held by current owners.
    pub fn confirmation_count(&self, index: u64) -> Result<usize, WalletError> {
        let state = self.read()?;
        state.ledger.effective_confirmations(index, &state.registry)
    }

    pub fn version(&self) -> u32 {
        ENGINE_VERSION
    }

    // ── Holding account ─────────────────────────────────────────────

    /// Credit incoming funds. Open to anyone, owner or not, like a plain
    /// transfer into the holding account. Returns the new balance.
    pub fn deposit(&self, sender: &SignerId, amount: u64) -> u64 {
        let balance = self.funds.deposit(amount);
        debug!(sender = %sender, amount, balance, "deposit received");
        self.events.emit(WalletEvent::Deposit {
            sender: sender.clone(),
            amount,
            balance,
        });
        balance
    }

    /// Read-through to the holding account's balance.
    pub fn get_balance(&self) -> u64 {
        self.funds.balance()
    }

    // ── Events ──────────────────────────────────────────────────────

    pub fn subscribe(&self) -> broadcast::Receiver<WalletEventEnvelope> {
        self.events.subscribe()
    }
}
