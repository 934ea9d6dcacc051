use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::ws::manager::WsManager;

/// Default period between keep-alive pings.
pub const HEARTBEAT_PERIOD: Duration = Duration::from_secs(30);

/// Keep idle subscribers alive and evict ones whose socket task has ended.
///
/// Runs every [`HEARTBEAT_PERIOD`] until the returned handle is aborted.
pub fn start_heartbeat(registry: Arc<WsManager>) -> JoinHandle<()> {
    start_heartbeat_every(registry, HEARTBEAT_PERIOD)
}

/// [`start_heartbeat`] with an explicit period.
pub fn start_heartbeat_every(registry: Arc<WsManager>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        // No catch-up bursts after a stall.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let (pinged, pruned) = registry.ping_all().await;
            if pruned > 0 {
                tracing::info!(pinged, pruned, "Heartbeat evicted closed subscribers");
            } else {
                tracing::trace!(pinged, "Heartbeat");
            }
        }
    })
}
