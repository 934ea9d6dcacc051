use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use polyglot_core::types::Timestamp;
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
struct WsConnection {
    sender: WsSender,
    connected_at: Timestamp,
}

/// A cloned handle to a live connection, as returned by
/// [`WsManager::live_handles`].
///
/// Holding a handle does not keep the connection registered.
#[derive(Debug, Clone)]
pub struct Subscriber {
    conn_id: String,
    sender: WsSender,
    connected_at: Timestamp,
}

/// The connection's outbound channel is closed.
#[derive(Debug, thiserror::Error)]
#[error("WebSocket connection {conn_id} is closed")]
pub struct DeliveryError {
    pub conn_id: String,
}

impl Subscriber {
    pub fn conn_id(&self) -> &str {
        &self.conn_id
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    /// Queue a message for this connection. Never blocks.
    pub fn send(&self, message: Message) -> Result<(), DeliveryError> {
        self.sender.send(message).map_err(|_| DeliveryError {
            conn_id: self.conn_id.clone(),
        })
    }
}

/// Registry of live WebSocket connections.
///
/// All mutation and snapshotting go through one interior `RwLock`; the map
/// itself is never handed out. Designed to be wrapped in `Arc` and shared
/// across the application.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    /// Create a new, empty connection manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink. Registering an id that is
    /// already present replaces the previous connection.
    pub async fn register(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection by its ID. Unknown IDs are a no-op.
    pub async fn unregister(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Remove the connection behind `handle`, unless its id has since been
    /// re-registered with a different channel.
    ///
    /// Returns `true` if a connection was removed.
    pub async fn unregister_handle(&self, handle: &Subscriber) -> bool {
        let mut conns = self.connections.write().await;
        match conns.get(&handle.conn_id) {
            Some(conn) if conn.sender.same_channel(&handle.sender) => {
                conns.remove(&handle.conn_id);
                true
            }
            _ => false,
        }
    }

    /// Snapshot of the currently registered connections.
    ///
    /// Later registrations and removals do not affect the returned list.
    pub async fn live_handles(&self) -> Vec<Subscriber> {
        self.connections
            .read()
            .await
            .iter()
            .map(|(id, conn)| Subscriber {
                conn_id: id.clone(),
                sender: conn.sender.clone(),
                connected_at: conn.connected_at,
            })
            .collect()
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Ping every connection and unregister those whose channel is closed.
    ///
    /// Returns `(pinged, pruned)`. Dead entries are removed in the same
    /// write-locked pass, so a connection re-registered under the same id
    /// afterwards is unaffected.
    pub async fn ping_all(&self) -> (usize, usize) {
        let mut conns = self.connections.write().await;
        let before = conns.len();
        conns.retain(|conn_id, conn| {
            let alive = conn.sender.send(Message::Ping(Bytes::new())).is_ok();
            if !alive {
                tracing::debug!(conn_id = %conn_id, "Pruning closed WebSocket connection on ping");
            }
            alive
        });
        let pinged = conns.len();
        (pinged, before - pinged)
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
