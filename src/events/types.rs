//! Progress event schema.

use std::fmt;
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::UnknownEventType;

/// The closed progress event catalog. `Connected` is only ever produced by the
/// registry when a subscriber attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Connected,
    LaneStart,
    LaneFinish,
    LaneError,
    Publish,
    Done,
    Progress,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Connected => "connected",
            EventType::LaneStart => "lane_start",
            EventType::LaneFinish => "lane_finish",
            EventType::LaneError => "lane_error",
            EventType::Publish => "publish",
            EventType::Done => "done",
            EventType::Progress => "progress",
        }
    }

    /// Whether callers outside the registry may emit this type.
    pub fn is_emittable(&self) -> bool {
        !matches!(self, EventType::Connected)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "connected" => Ok(EventType::Connected),
            "lane_start" => Ok(EventType::LaneStart),
            "lane_finish" => Ok(EventType::LaneFinish),
            "lane_error" => Ok(EventType::LaneError),
            "publish" => Ok(EventType::Publish),
            "done" => Ok(EventType::Done),
            "progress" => Ok(EventType::Progress),
            other => Err(UnknownEventType(other.to_string())),
        }
    }
}

/// One message on the event stream. Payload fields are flattened next to the
/// envelope fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub correlation_id: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ProgressEvent {
    pub fn with_now(
        event_type: EventType,
        correlation_id: impl Into<String>,
        payload: Map<String, Value>,
    ) -> Self {
        Self {
            event_type,
            correlation_id: correlation_id.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            payload,
        }
    }

    pub fn connected(correlation_id: impl Into<String>) -> Self {
        let mut payload = Map::new();
        payload.insert("message".to_string(), json!("connected"));
        Self::with_now(EventType::Connected, correlation_id, payload)
    }

    pub fn to_json(&self) -> String {
        // Map<String, Value> plus plain strings cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Select and shape the type-specific fields of a raw payload.
pub fn shape_payload(event_type: EventType, raw: &Value, preview_chars: usize) -> Map<String, Value> {
    let field = |name: &str| raw.get(name).cloned().unwrap_or(Value::Null);
    let text = |name: &str| raw.get(name).and_then(value_text);

    let mut payload = Map::new();
    match event_type {
        EventType::Connected => {
            payload.insert("message".to_string(), json!("connected"));
        }
        EventType::LaneStart => {
            payload.insert("lane".to_string(), field("lane"));
            payload.insert(
                "prompt_preview".to_string(),
                json!(text("prompt").map(|p| preview(&p, preview_chars))),
            );
        }
        EventType::LaneFinish => {
            let output = text("output");
            payload.insert("lane".to_string(), field("lane"));
            payload.insert(
                "output_preview".to_string(),
                json!(output.as_deref().map(|o| preview(o, preview_chars))),
            );
            payload.insert(
                "output_length".to_string(),
                json!(output.as_deref().map(|o| o.chars().count())),
            );
            payload.insert("eval_score".to_string(), field("eval_score"));
        }
        EventType::LaneError => {
            payload.insert("lane".to_string(), field("lane"));
            payload.insert("error".to_string(), field("error"));
        }
        EventType::Publish => {
            payload.insert("content_type".to_string(), field("content_type"));
            payload.insert("output_id".to_string(), field("output_id"));
        }
        EventType::Done => {
            payload.insert("summary".to_string(), field("summary"));
        }
        EventType::Progress => {
            payload.insert("data".to_string(), field("data"));
        }
    }
    payload
}

/// Truncate on a char boundary, marking the cut with `...`.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
