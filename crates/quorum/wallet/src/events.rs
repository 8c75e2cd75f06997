use quorum_types::{WalletEvent, WalletEventEnvelope};
use tokio::sync::broadcast;

/// Channel capacity for the wallet event stream.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Fire-and-forget notification stream for committed wallet mutations.
///
/// No engine logic depends on delivery; a send with no subscribers is fine
/// and a lagging subscriber only loses its own backlog.
pub struct WalletEventBus {
    tx: broadcast::Sender<WalletEventEnvelope>,
}

impl WalletEventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WalletEventEnvelope> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Stamp and publish an event, ignoring the no-subscriber case.
    pub fn emit(&self, event: WalletEvent) {
        let _ = self.tx.send(WalletEventEnvelope::new(event));
    }
}

impl Default for WalletEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for WalletEventBus {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}
