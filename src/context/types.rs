//! Unified context sections.
//!
//! The serialized layout is a fixed contract with the execution engine: every
//! section and every field is always present. Missing data serializes as
//! `null`, `[]` or a documented default, never as an omitted key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lanes::LaneActivation;

pub const SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedContext {
    pub meta: ContextMeta,
    pub routing: Routing,
    pub entity_context: EntityContext,
    pub audience_context: AudienceContext,
    pub content_type: ContentTypeContract,
    pub lane_plan: Vec<LaneActivation>,
    pub rules: Vec<Value>,
    pub user_input: UserInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMeta {
    pub schema_version: String,
    pub correlation_id: String,
    pub workflow_id: Option<String>,
    pub content_type_id: Option<String>,
    pub entity_id: Option<String>,
    pub lane_id: Option<String>,
    pub idempotency_key: String,
    /// RFC 3339, millisecond precision, UTC.
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routing {
    pub provider: String,
    pub model: String,
    pub webhook_url: Option<String>,
    pub event_stream_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityContext {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub voice: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudienceContext {
    pub audience: Option<String>,
    pub pain_points: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTypeContract {
    pub id: Option<String>,
    pub name: Option<String>,
    pub destination: String,
    pub field_schema: Vec<Value>,
    pub validators: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInput {
    pub goal: Option<String>,
    pub topic: Option<String>,
    pub input: Option<String>,
    pub notes: Option<String>,
}
