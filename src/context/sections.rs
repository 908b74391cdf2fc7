//! Section composition from resolved records.
//!
//! Every builder accepts an absent record and falls back to the documented
//! defaults for its section.

use serde_json::Value;
use tracing::warn;

use crate::aliases::{keys, AliasCatalog};
use crate::context::settings::{DefaultsConfig, RoutingConfig};
use crate::context::types::{
    AudienceContext, ContentTypeContract, EntityContext, Routing, UserInput,
};
use crate::record::{FieldValue, SourceRecord};
use crate::resolve::{resolve, resolve_text};

pub struct SectionBuilder<'a> {
    catalog: &'a AliasCatalog,
}

impl<'a> SectionBuilder<'a> {
    pub fn new(catalog: &'a AliasCatalog) -> Self {
        Self { catalog }
    }

    fn text(&self, record: Option<&SourceRecord>, key: &str) -> Option<String> {
        resolve_text(record, self.catalog.aliases(key))
    }

    /// Workflow-level overrides first, then configured defaults.
    pub fn routing(
        &self,
        correlation_id: &str,
        workflow: Option<&SourceRecord>,
        config: &RoutingConfig,
    ) -> Routing {
        Routing {
            provider: self
                .text(workflow, keys::PROVIDER)
                .unwrap_or_else(|| config.provider.clone()),
            model: self
                .text(workflow, keys::MODEL)
                .unwrap_or_else(|| config.model.clone()),
            webhook_url: config.webhook_url.clone(),
            event_stream_url: config.event_stream_url(correlation_id),
        }
    }

    pub fn entity(&self, entity: Option<&SourceRecord>) -> EntityContext {
        EntityContext {
            id: entity.map(|r| r.id.clone()),
            name: self.text(entity, keys::ENTITY_NAME),
            description: self.text(entity, keys::ENTITY_DESCRIPTION),
            voice: self.text(entity, keys::ENTITY_VOICE),
            website: self.text(entity, keys::ENTITY_WEBSITE),
        }
    }

    /// Audience set on the primary record wins over the entity's standing audience.
    pub fn audience(
        &self,
        primary: &SourceRecord,
        entity: Option<&SourceRecord>,
    ) -> AudienceContext {
        let pick = |key: &str| self.text(Some(primary), key).or_else(|| self.text(entity, key));
        AudienceContext {
            audience: pick(keys::AUDIENCE),
            pain_points: pick(keys::AUDIENCE_PAIN_POINTS),
        }
    }

    pub fn content_type(
        &self,
        content_type: Option<&SourceRecord>,
        defaults: &DefaultsConfig,
    ) -> ContentTypeContract {
        ContentTypeContract {
            id: content_type.map(|r| r.id.clone()),
            name: self.text(content_type, keys::CONTENT_TYPE_NAME),
            destination: self
                .text(content_type, keys::DESTINATION)
                .unwrap_or_else(|| defaults.destination.clone()),
            field_schema: self.json_list(content_type, keys::FIELD_SCHEMA),
            validators: self.json_list(content_type, keys::VALIDATORS),
        }
    }

    /// Validators followed by workflow rules. Duplicates are kept.
    pub fn rules(
        &self,
        contract: &ContentTypeContract,
        workflow: Option<&SourceRecord>,
    ) -> Vec<Value> {
        let mut rules = contract.validators.clone();
        rules.extend(self.json_list(workflow, keys::WORKFLOW_RULES));
        rules
    }

    pub fn user_input(&self, primary: &SourceRecord) -> UserInput {
        UserInput {
            goal: self.text(Some(primary), keys::GOAL),
            topic: self.text(Some(primary), keys::TOPIC),
            input: self.text(Some(primary), keys::USER_INPUT),
            notes: self.text(Some(primary), keys::NOTES),
        }
    }

    /// A list stored natively or as a JSON-encoded string. Malformed JSON is
    /// logged and treated as absent.
    pub fn json_list(&self, record: Option<&SourceRecord>, key: &str) -> Vec<Value> {
        match resolve(record, self.catalog.aliases(key)) {
            None => Vec::new(),
            Some(FieldValue::List(items)) => items.iter().map(FieldValue::to_json).collect(),
            Some(FieldValue::String(raw)) if raw.trim().is_empty() => Vec::new(),
            Some(FieldValue::String(raw)) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Array(items)) => items,
                Ok(Value::Null) => Vec::new(),
                Ok(other) => vec![other],
                Err(e) => {
                    warn!(
                        record = record.map(|r| r.id.as_str()).unwrap_or_default(),
                        field = key,
                        error = %e,
                        "Malformed JSON payload; treating as absent"
                    );
                    Vec::new()
                }
            },
            Some(other) => vec![other.to_json()],
        }
    }
}
