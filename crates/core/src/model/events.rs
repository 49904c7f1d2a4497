//! Observer events emitted by the catalog model.
//!
//! The presentation collaborator registers one receiver and drives its
//! loading indicator, list refresh, and navigation from these. Delivery is
//! over an async channel so the core stays decoupled from any UI technology.

use tokio::sync::mpsc;

use crate::service::{Detail, ServiceError};

/// Async lifecycle notifications, delivered per logical operation in the
/// order `WillFetch` then `DidFetch` then `DetailReady` (when applicable).
#[derive(Debug)]
pub enum ModelEvent {
    /// A remote fetch is about to start (show the loading indicator).
    WillFetch,
    /// A remote fetch finished. `reload` is true when the fetch produced
    /// data worth re-rendering the list for.
    DidFetch {
        error: Option<ServiceError>,
        reload: bool,
    },
    /// A detail record is resolved and ready to present.
    DetailReady(Detail),
}

/// Handle for emitting model events.
///
/// Cheaply cloneable. A send failure (observer gone, channel full) is
/// logged and never propagated to the operation that emitted it.
#[derive(Clone)]
pub struct ObserverHandle {
    tx: mpsc::Sender<ModelEvent>,
}

impl ObserverHandle {
    /// Create a handle from an existing channel sender.
    pub fn new(tx: mpsc::Sender<ModelEvent>) -> Self {
        Self { tx }
    }

    /// Create a handle together with its receiving end.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ModelEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Emit an event, waiting for channel capacity.
    pub async fn emit(&self, event: ModelEvent) {
        if let Err(e) = self.tx.send(event).await {
            tracing::warn!("Failed to emit model event: {}", e);
        }
    }

    /// Emit an event without blocking. Returns true if it was sent.
    pub fn try_emit(&self, event: ModelEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to emit model event: {}", e);
                false
            }
        }
    }
}
