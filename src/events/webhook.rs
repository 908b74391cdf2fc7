//! Inbound progress webhook from the execution engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::events::bus::{EmitReport, EventBus};
use crate::events::types::EventType;

/// Progress notification posted by the execution engine. Only `event_type`
/// and `correlation_id` are interpreted here; the remaining fields are taken
/// as whatever JSON the engine sends and shaped per event type by the bus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub event_type: String,
    #[serde(default, alias = "record_id", alias = "recordId")]
    pub correlation_id: String,
    #[serde(default)]
    pub lane: Option<Value>,
    #[serde(default)]
    pub prompt: Option<Value>,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub eval_score: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub content_type: Option<Value>,
    #[serde(default)]
    pub output_id: Option<Value>,
    #[serde(default)]
    pub summary: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl WebhookPayload {
    /// Present fields as a flat JSON object for the bus.
    pub fn event_payload(&self) -> Value {
        let fields = [
            ("lane", &self.lane),
            ("prompt", &self.prompt),
            ("output", &self.output),
            ("eval_score", &self.eval_score),
            ("error", &self.error),
            ("content_type", &self.content_type),
            ("output_id", &self.output_id),
            ("summary", &self.summary),
            ("data", &self.data),
        ];
        let map: Map<String, Value> = fields
            .into_iter()
            .filter_map(|(name, value)| value.clone().map(|v| (name.to_string(), v)))
            .collect();
        Value::Object(map)
    }
}

/// Response to the engine. Unknown event types are still acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
    pub forwarded: bool,
    pub event_type: String,
    pub delivered: usize,
}

/// Route a webhook to the bus by its `event_type`.
pub fn route_webhook(bus: &EventBus, payload: &WebhookPayload) -> WebhookAck {
    let ack = |forwarded: bool, delivered: usize| WebhookAck {
        received: true,
        forwarded,
        event_type: payload.event_type.clone(),
        delivered,
    };

    let event_type = match payload.event_type.parse::<EventType>() {
        Ok(t) if t.is_emittable() => t,
        _ => {
            warn!(
                correlation_id = %payload.correlation_id,
                event_type = %payload.event_type,
                "Unknown webhook event type; acknowledged, not forwarded"
            );
            return ack(false, 0);
        }
    };

    if payload.correlation_id.trim().is_empty() {
        warn!(event_type = %event_type, "Webhook without correlation id; acknowledged, not forwarded");
        return ack(false, 0);
    }

    info!(
        correlation_id = %payload.correlation_id,
        event_type = %event_type,
        lane = ?payload.lane,
        "Progress webhook received"
    );

    match bus.emit_typed(&payload.correlation_id, event_type, &payload.event_payload()) {
        EmitReport::Delivered { delivered, .. } => ack(true, delivered),
        EmitReport::NoSubscribers => ack(true, 0),
        EmitReport::Rejected { .. } => ack(false, 0),
    }
}
