//! Shared relay state: the pairing handler plus one outbound channel per
//! live connection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use focuspair_common::{ClientMessage, ConnectionId, RoomCode, ServerMessage};
use tokio::sync::{mpsc, Mutex};

use crate::pairing::{Delivery, PairingHandler};
use crate::registry::RoomRegistry;

/// Per-connection outbound queue.
pub type Outbox = mpsc::Sender<ServerMessage>;

struct Inner {
    handler: PairingHandler,
    outboxes: HashMap<ConnectionId, Outbox>,
}

/// Counts reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub rooms: usize,
    pub connections: usize,
}

/// Thread-safe handle to the relay state. Cheap to clone.
///
/// Every operation runs under one lock, so the handler sees requests one at a
/// time. Deliveries are sent after the lock is released.
#[derive(Clone)]
pub struct RoomStore {
    inner: Arc<Mutex<Inner>>,
    next_id: Arc<AtomicU64>,
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomStore {
    pub fn new() -> Self {
        Self::with_registry(RoomRegistry::new())
    }

    pub fn with_registry(registry: RoomRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                handler: PairingHandler::new(registry),
                outboxes: HashMap::new(),
            })),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a new connection and return its identifier.
    pub async fn register(&self, outbox: Outbox) -> ConnectionId {
        let id = ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.lock().await.outboxes.insert(id, outbox);
        id
    }

    /// Handle one message from `from` and deliver the results.
    pub async fn dispatch(&self, from: ConnectionId, message: ClientMessage) {
        let pending = {
            let mut inner = self.inner.lock().await;
            let deliveries = inner.handler.handle(from, message);
            inner.resolve(deliveries)
        };
        deliver(pending).await;
    }

    /// Drop `from` and notify its peer, if any.
    pub async fn disconnect(&self, from: ConnectionId) {
        let pending = {
            let mut inner = self.inner.lock().await;
            inner.outboxes.remove(&from);
            let deliveries = inner.handler.disconnect(from);
            inner.resolve(deliveries)
        };
        deliver(pending).await;
    }

    pub async fn stats(&self) -> StoreStats {
        let inner = self.inner.lock().await;
        StoreStats {
            rooms: inner.handler.registry().len(),
            connections: inner.outboxes.len(),
        }
    }

    /// Members of a room, or `None` if no such room is live.
    pub async fn room_members(&self, code: &RoomCode) -> Option<Vec<ConnectionId>> {
        let inner = self.inner.lock().await;
        let registry = inner.handler.registry();
        registry
            .contains(code)
            .then(|| registry.members(code).to_vec())
    }
}

impl Inner {
    /// Pair each delivery with its recipient's outbox. Recipients that have
    /// already gone away are skipped.
    fn resolve(&self, deliveries: Vec<Delivery>) -> Vec<(Outbox, Delivery)> {
        deliveries
            .into_iter()
            .filter_map(|d| match self.outboxes.get(&d.to) {
                Some(outbox) => Some((outbox.clone(), d)),
                None => {
                    tracing::debug!(conn = %d.to, "Dropping delivery for closed connection");
                    None
                }
            })
            .collect()
    }
}

async fn deliver(pending: Vec<(Outbox, Delivery)>) {
    for (outbox, delivery) in pending {
        if outbox.send(delivery.message).await.is_err() {
            tracing::debug!(conn = %delivery.to, "Outbox closed");
        }
    }
}
