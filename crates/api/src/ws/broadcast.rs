use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::Mutex;

use crate::ws::manager::WsManager;

/// Result of one broadcast round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Connections the message was queued for.
    pub delivered: usize,
    /// Connections found closed and unregistered during this round.
    pub pruned: usize,
}

/// Pushes text messages to every live WebSocket connection.
///
/// Rounds are serialized: the fair `round` lock is held from snapshot to the
/// last send, so every connection sees messages in the order `broadcast`
/// was called. Sends only enqueue on an unbounded channel, so holding the
/// lock never waits on a slow socket.
pub struct Broadcaster {
    registry: Arc<WsManager>,
    round: Mutex<()>,
}

impl Broadcaster {
    pub fn new(registry: Arc<WsManager>) -> Self {
        Self {
            registry,
            round: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &Arc<WsManager> {
        &self.registry
    }

    /// Deliver `text` to every connection in a fresh registry snapshot.
    ///
    /// A closed connection does not stop delivery to the others; it is
    /// unregistered before this call returns. No retries, no acks.
    pub async fn broadcast(&self, text: impl Into<String>) -> BroadcastOutcome {
        let text: String = text.into();
        let message = Message::Text(text.into());
        let _round = self.round.lock().await;

        let handles = self.registry.live_handles().await;
        let mut outcome = BroadcastOutcome::default();
        let mut dead = Vec::new();

        for handle in handles {
            match handle.send(message.clone()) {
                Ok(()) => outcome.delivered += 1,
                Err(e) => {
                    tracing::debug!(conn_id = %e.conn_id, "Dropping closed WebSocket connection");
                    dead.push(handle);
                }
            }
        }

        for handle in &dead {
            if self.registry.unregister_handle(handle).await {
                outcome.pruned += 1;
            }
        }

        outcome
    }
}
