use std::sync::Arc;

use context_relay::aliases::{AliasCatalog, AliasConfig};
use context_relay::context::{ContextAssembler, DefaultsConfig, RoutingConfig};
use context_relay::error::{ApiError, StoreError};
use context_relay::lanes::LaneActivation;
use context_relay::record::SourceRecord;
use context_relay::store::MemoryRecordStore;
use serde_json::{json, Value};

use crate::integration::test_utils::{
    assembler, content_type_t1, entity_e1, full_store, primary_rec123, workflow_w1,
};

#[tokio::test]
async fn rec123_scenario_plans_single_sub_lane() {
    let context = assembler(full_store()).assemble("rec123", None).await.unwrap();
    assert_eq!(
        context.lane_plan,
        vec![LaneActivation {
            lane: "A1.1".to_string(),
            enabled: true
        }]
    );
}

#[tokio::test]
async fn full_context_composes_every_section() {
    let context = assembler(full_store())
        .assemble("rec123", Some("A1.1"))
        .await
        .unwrap();

    assert_eq!(context.meta.correlation_id, "rec123");
    assert_eq!(context.meta.workflow_id.as_deref(), Some("recW1"));
    assert_eq!(context.meta.content_type_id.as_deref(), Some("recT1"));
    assert_eq!(context.meta.entity_id.as_deref(), Some("recE1"));
    assert_eq!(context.meta.lane_id.as_deref(), Some("A1.1"));
    assert_eq!(
        context.meta.idempotency_key,
        context_relay::context::idempotency_key("rec123", Some("A1.1"))
    );

    assert_eq!(context.routing.model, "gpt-4o-mini");
    assert_eq!(context.entity_context.name.as_deref(), Some("Acme"));
    assert_eq!(context.entity_context.voice.as_deref(), Some("Friendly"));
    assert_eq!(
        context.audience_context.audience.as_deref(),
        Some("Existing customers")
    );
    assert_eq!(
        context.audience_context.pain_points.as_deref(),
        Some("Too many tabs")
    );
    assert_eq!(context.content_type.destination, "linkedin");
    assert_eq!(context.content_type.field_schema.len(), 1);
    assert_eq!(
        context.rules,
        vec![
            json!("max_3000_chars"),
            json!("no_emojis"),
            json!("no_emojis"),
            json!("cite_sources")
        ]
    );
    assert_eq!(
        context.user_input.goal.as_deref(),
        Some("Announce the spring release")
    );
    assert_eq!(context.user_input.input.as_deref(), Some("Three short posts"));
}

#[tokio::test]
async fn primary_fetch_failure_is_fatal() {
    let result = assembler(full_store()).assemble("rec404", None).await;
    match result {
        Err(ApiError::AssemblyFailed {
            correlation_id,
            source: StoreError::NotFound(_),
        }) => assert_eq!(correlation_id, "rec404"),
        other => panic!("expected AssemblyFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn linked_fetch_failures_degrade_sections() {
    let store = full_store();
    store.fail_on("recW1", "timeout");
    store.fail_on("recT1", "timeout");
    store.fail_on("recE1", "timeout");

    let context = assembler(store).assemble("rec123", None).await.unwrap();

    assert_eq!(context.meta.workflow_id.as_deref(), Some("recW1"));
    assert!(context.lane_plan.is_empty());
    assert_eq!(context.routing.model, RoutingConfig::default().model);
    assert_eq!(context.entity_context.id, None);
    assert_eq!(context.entity_context.name, None);
    assert_eq!(context.content_type.id, None);
    assert_eq!(context.content_type.destination, "default");
    assert!(context.content_type.field_schema.is_empty());
    assert!(context.rules.is_empty());
    // Primary-sourced sections are unaffected.
    assert_eq!(context.user_input.topic.as_deref(), Some("Spring release"));
}

#[tokio::test]
async fn serialized_layout_keeps_every_key_when_data_is_missing() {
    let store = MemoryRecordStore::with_records([SourceRecord::new("bare")]);
    let context = assembler(store).assemble("bare", None).await.unwrap();
    let value: Value = serde_json::to_value(&context).unwrap();

    for section in [
        "meta",
        "routing",
        "entity_context",
        "audience_context",
        "content_type",
        "lane_plan",
        "rules",
        "user_input",
    ] {
        assert!(value.get(section).is_some(), "missing section {section}");
    }
    for key in [
        "schema_version",
        "correlation_id",
        "workflow_id",
        "content_type_id",
        "entity_id",
        "lane_id",
        "idempotency_key",
        "generated_at",
    ] {
        assert!(value["meta"].get(key).is_some(), "missing meta.{key}");
    }
    assert_eq!(value["meta"]["workflow_id"], Value::Null);
    assert_eq!(value["routing"]["webhook_url"], Value::Null);
    assert_eq!(value["entity_context"]["name"], Value::Null);
    assert_eq!(value["audience_context"]["audience"], Value::Null);
    assert_eq!(value["content_type"]["destination"], "default");
    assert_eq!(value["content_type"]["validators"], json!([]));
    assert_eq!(value["lane_plan"], json!([]));
    assert_eq!(value["user_input"]["goal"], Value::Null);
}

#[tokio::test]
async fn configured_settings_flow_into_routing_and_defaults() {
    let store = MemoryRecordStore::with_records([SourceRecord::new("rec1")]);
    let routing = RoutingConfig {
        webhook_url: Some("https://relay.test/webhook".to_string()),
        event_stream_base_url: Some("https://relay.test/events".to_string()),
        ..RoutingConfig::default()
    };
    let defaults = DefaultsConfig {
        destination: "blog".to_string(),
    };
    let assembler = ContextAssembler::with_settings(
        Arc::new(store),
        Arc::new(AliasCatalog::builtin()),
        routing,
        defaults,
    );

    let context = assembler.assemble("rec1", None).await.unwrap();
    assert_eq!(
        context.routing.webhook_url.as_deref(),
        Some("https://relay.test/webhook")
    );
    assert_eq!(
        context.routing.event_stream_url.as_deref(),
        Some("https://relay.test/events/rec1")
    );
    assert_eq!(context.content_type.destination, "blog");
}

#[tokio::test]
async fn alias_overrides_resolve_renamed_fields() {
    let mut primary = primary_rec123().with_field("Flow", vec!["recW1"]);
    primary.fields.shift_remove("Workflow");
    let store = MemoryRecordStore::with_records([
        primary,
        workflow_w1(),
        entity_e1(),
        content_type_t1(),
    ]);

    let mut aliases = AliasConfig::default();
    aliases
        .prepend
        .insert("workflow_link".to_string(), vec!["Flow".to_string()]);
    let assembler = ContextAssembler::new(
        Arc::new(store),
        Arc::new(AliasCatalog::with_config(&aliases)),
    );

    let context = assembler.assemble("rec123", None).await.unwrap();
    assert_eq!(context.meta.workflow_id.as_deref(), Some("recW1"));
    assert_eq!(context.lane_plan.len(), 1);
}

#[tokio::test]
async fn idempotency_key_is_stable_across_assemblies() {
    let assembler = assembler(full_store());
    let first = assembler.assemble("rec123", None).await.unwrap();
    let second = assembler.assemble("rec123", None).await.unwrap();
    let laned = assembler.assemble("rec123", Some("A1.1")).await.unwrap();
    assert_eq!(first.meta.idempotency_key, second.meta.idempotency_key);
    assert_ne!(first.meta.idempotency_key, laned.meta.idempotency_key);
}
