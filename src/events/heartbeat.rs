//! Periodic heartbeats to keep idle stream connections open.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::trace;

use crate::events::registry::ConnectionRegistry;
use crate::events::sink::StreamFrame;

/// Send one heartbeat to every registered sink. Returns how many accepted it.
pub fn beat(registry: &ConnectionRegistry) -> usize {
    let mut sent = 0usize;
    for (correlation_id, sink) in registry.all_sinks() {
        match sink.send(StreamFrame::Heartbeat) {
            Ok(()) => sent += 1,
            Err(e) => trace!(
                correlation_id = %correlation_id,
                sink = sink.id(),
                error = %e,
                "Heartbeat not delivered"
            ),
        }
    }
    sent
}

/// Spawn a task sending heartbeats every `every`. Abort the handle to stop.
pub fn spawn_heartbeat(registry: Arc<ConnectionRegistry>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let sent = beat(&registry);
            trace!(sent, "Heartbeat sent");
        }
    })
}
