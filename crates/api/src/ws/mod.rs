//! WebSocket infrastructure for job progress notifications.
//!
//! Provides the connection registry, the broadcaster built on it, heartbeat
//! pings, and the HTTP upgrade handler used by the `/ws/` route.

mod broadcast;
mod handler;
mod heartbeat;
pub mod manager;

pub use broadcast::{BroadcastOutcome, Broadcaster};
pub use handler::ws_handler;
pub use heartbeat::{start_heartbeat, start_heartbeat_every, HEARTBEAT_PERIOD};
pub use manager::{DeliveryError, Subscriber, WsManager};
