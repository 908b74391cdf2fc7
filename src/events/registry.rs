//! Connection registry: live sinks per correlation id.
//!
//! Entries exist only while they have subscribers. A [`Subscription`] owns its
//! registration and removes it when dropped, so a closed connection never
//! lingers in the map.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use crate::events::sink::{ChannelSink, EventSink, SinkId, StreamFrame};
use crate::events::types::ProgressEvent;

#[derive(Default)]
pub struct ConnectionRegistry {
    subscribers: Mutex<HashMap<String, Vec<Arc<dyn EventSink>>>>,
    last_sink_id: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Next sink id, unique within this registry.
    pub fn allocate_sink_id(&self) -> SinkId {
        self.last_sink_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Add a sink and greet it with a `connected` event. Only the new sink
    /// sees the greeting.
    pub fn register(&self, correlation_id: &str, sink: Arc<dyn EventSink>) {
        let greeting = ProgressEvent::connected(correlation_id);
        let frame = StreamFrame::Event {
            event_type: greeting.event_type,
            body: greeting.to_json(),
        };

        let mut subscribers = self.subscribers.lock();
        let list = subscribers.entry(correlation_id.to_string()).or_default();
        list.push(sink.clone());
        let count = list.len();
        // Sent under the lock so no emitted event can overtake the greeting.
        if let Err(e) = sink.send(frame) {
            warn!(correlation_id, sink = sink.id(), error = %e, "Failed to send connected event");
        }
        drop(subscribers);

        debug!(correlation_id, sink = sink.id(), subscribers = count, "Subscriber registered");
    }

    /// Remove a sink. Idempotent; returns whether anything was removed.
    pub fn unregister(&self, correlation_id: &str, sink_id: SinkId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let Some(list) = subscribers.get_mut(correlation_id) else {
            return false;
        };
        let before = list.len();
        list.retain(|s| s.id() != sink_id);
        let removed = list.len() != before;
        if list.is_empty() {
            subscribers.remove(correlation_id);
        }
        drop(subscribers);

        if removed {
            debug!(correlation_id, sink = sink_id, "Subscriber unregistered");
        }
        removed
    }

    /// Subscribers as of now. Later registrations are not reflected.
    pub fn snapshot(&self, correlation_id: &str) -> Vec<Arc<dyn EventSink>> {
        self.subscribers
            .lock()
            .get(correlation_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Every live sink with its correlation id.
    pub fn all_sinks(&self) -> Vec<(String, Arc<dyn EventSink>)> {
        self.subscribers
            .lock()
            .iter()
            .flat_map(|(id, sinks)| sinks.iter().map(move |s| (id.clone(), s.clone())))
            .collect()
    }

    pub fn subscriber_count(&self, correlation_id: &str) -> usize {
        self.subscribers
            .lock()
            .get(correlation_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn active_correlation_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.subscribers.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Open a channel-backed subscription for a correlation id.
    pub fn subscribe(self: &Arc<Self>, correlation_id: &str) -> Subscription {
        let sink_id = self.allocate_sink_id();
        let (sink, receiver) = ChannelSink::new_pair(sink_id);
        self.register(correlation_id, sink);
        Subscription {
            correlation_id: correlation_id.to_string(),
            sink_id,
            receiver,
            registry: Arc::clone(self),
            finished: false,
        }
    }
}

/// A live subscriber stream. Dropping it is the close signal.
pub struct Subscription {
    correlation_id: String,
    sink_id: SinkId,
    receiver: UnboundedReceiver<StreamFrame>,
    registry: Arc<ConnectionRegistry>,
    finished: bool,
}

impl Subscription {
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn sink_id(&self) -> SinkId {
        self.sink_id
    }

    /// Next frame, or `None` once the stream has ended. A `done` event is
    /// delivered and then ends the stream.
    pub async fn next_frame(&mut self) -> Option<StreamFrame> {
        if self.finished {
            return None;
        }
        let frame = self.receiver.recv().await?;
        self.observe(&frame);
        Some(frame)
    }

    /// Non-waiting variant of [`Subscription::next_frame`].
    pub fn try_next_frame(&mut self) -> Option<StreamFrame> {
        if self.finished {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(frame) => {
                self.observe(&frame);
                Some(frame)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    fn observe(&mut self, frame: &StreamFrame) {
        if frame.is_done() {
            self.finished = true;
            self.registry.unregister(&self.correlation_id, self.sink_id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.unregister(&self.correlation_id, self.sink_id);
    }
}
