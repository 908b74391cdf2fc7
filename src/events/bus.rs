//! Event bus: validates progress events and fans them out to the current
//! subscribers of a correlation id.
//!
//! Delivery is at-most-once and best-effort. Nothing is buffered for absent
//! subscribers and nothing is replayed for late ones.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::events::registry::ConnectionRegistry;
use crate::events::sink::StreamFrame;
use crate::events::types::{shape_payload, EventType, ProgressEvent};
use crate::events::DEFAULT_PREVIEW_CHARS;

/// What happened to one `emit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitReport {
    /// The type is not in the catalog, or is registry-internal.
    Rejected { event_type: String },
    NoSubscribers,
    Delivered { delivered: usize, failed: usize },
}

pub struct EventBus {
    registry: Arc<ConnectionRegistry>,
    preview_chars: usize,
    // Held across snapshot and delivery so every subscriber of an id sees
    // events in emit order.
    delivery: Mutex<()>,
}

impl EventBus {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self::with_preview_chars(registry, DEFAULT_PREVIEW_CHARS)
    }

    pub fn with_preview_chars(registry: Arc<ConnectionRegistry>, preview_chars: usize) -> Self {
        Self {
            registry,
            preview_chars,
            delivery: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Emit by type name. Unknown names are logged and dropped.
    pub fn emit(&self, correlation_id: &str, event_type: &str, payload: &Value) -> EmitReport {
        match event_type.parse::<EventType>() {
            Ok(parsed) => self.emit_typed(correlation_id, parsed, payload),
            Err(e) => {
                warn!(correlation_id, error = %e, "Dropping event");
                EmitReport::Rejected {
                    event_type: event_type.to_string(),
                }
            }
        }
    }

    pub fn emit_typed(
        &self,
        correlation_id: &str,
        event_type: EventType,
        payload: &Value,
    ) -> EmitReport {
        if !event_type.is_emittable() {
            warn!(correlation_id, event_type = %event_type, "Dropping registry-internal event");
            return EmitReport::Rejected {
                event_type: event_type.to_string(),
            };
        }

        let _delivery = self.delivery.lock();
        let sinks = self.registry.snapshot(correlation_id);
        if sinks.is_empty() {
            debug!(correlation_id, event_type = %event_type, "No subscribers; event dropped");
            return EmitReport::NoSubscribers;
        }

        let event = ProgressEvent::with_now(
            event_type,
            correlation_id,
            shape_payload(event_type, payload, self.preview_chars),
        );
        let body = event.to_json();

        let mut delivered = 0usize;
        let mut failed = 0usize;
        for sink in &sinks {
            let frame = StreamFrame::Event {
                event_type,
                body: body.clone(),
            };
            match sink.send(frame) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    failed += 1;
                    warn!(
                        correlation_id,
                        sink = sink.id(),
                        event_type = %event_type,
                        error = %e,
                        "Event delivery failed"
                    );
                }
            }
        }

        debug!(
            correlation_id,
            event_type = %event_type,
            delivered,
            failed,
            "Event broadcast"
        );
        EmitReport::Delivered { delivered, failed }
    }
}
