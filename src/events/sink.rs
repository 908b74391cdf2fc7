//! Event sinks: the write side of one subscriber's stream connection.

use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::error::DeliveryError;
use crate::events::types::EventType;

/// Identifies a sink within the registry that allocated it.
pub type SinkId = u64;

/// One unit written to a stream connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    Event { event_type: EventType, body: String },
    /// Keeps idle connections open. Carries no payload.
    Heartbeat,
}

impl StreamFrame {
    pub fn is_done(&self) -> bool {
        matches!(
            self,
            StreamFrame::Event {
                event_type: EventType::Done,
                ..
            }
        )
    }

    /// Server-sent events wire format.
    pub fn to_sse(&self) -> String {
        match self {
            StreamFrame::Event { body, .. } => format!("data: {}\n\n", body),
            StreamFrame::Heartbeat => ": heartbeat\n\n".to_string(),
        }
    }
}

/// Write side of a subscriber connection.
///
/// `send` must not block and must not call back into the registry; it runs
/// while delivery for a correlation id is serialized.
pub trait EventSink: Send + Sync {
    fn id(&self) -> SinkId;

    fn send(&self, frame: StreamFrame) -> Result<(), DeliveryError>;
}

/// Sink backed by an unbounded channel; the receiver is the stream connection.
pub struct ChannelSink {
    id: SinkId,
    sender: UnboundedSender<StreamFrame>,
}

impl ChannelSink {
    pub fn new_pair(id: SinkId) -> (Arc<Self>, UnboundedReceiver<StreamFrame>) {
        let (sender, receiver) = unbounded_channel();
        let sink = Arc::new(Self { id, sender });
        (sink, receiver)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl EventSink for ChannelSink {
    fn id(&self) -> SinkId {
        self.id
    }

    fn send(&self, frame: StreamFrame) -> Result<(), DeliveryError> {
        self.sender.send(frame).map_err(|_| DeliveryError::Closed)
    }
}
