use std::sync::Arc;

use context_relay::config::RelayConfig;
use context_relay::events::{route_webhook, ConnectionRegistry, EventBus, StreamFrame, WebhookPayload};
use context_relay::Relay;
use serde_json::{json, Value};

use crate::integration::test_utils::full_store;

fn payload(raw: Value) -> WebhookPayload {
    serde_json::from_value(raw).unwrap()
}

fn event_body(frame: Option<StreamFrame>) -> Value {
    match frame {
        Some(StreamFrame::Event { body, .. }) => serde_json::from_str(&body).unwrap(),
        other => panic!("expected an event frame, got {:?}", other),
    }
}

#[test]
fn lane_finish_reaches_subscriber_with_preview() {
    let registry = ConnectionRegistry::shared();
    let bus = EventBus::new(registry.clone());
    let mut sub = registry.subscribe("rec123");
    let _ = sub.try_next_frame();

    let ack = route_webhook(
        &bus,
        &payload(json!({
            "event_type": "lane_finish",
            "record_id": "rec123",
            "lane": "A1.1",
            "output": "hello world",
            "eval_score": 0.92
        })),
    );
    assert!(ack.received);
    assert!(ack.forwarded);
    assert_eq!(ack.delivered, 1);

    let message = event_body(sub.try_next_frame());
    assert_eq!(message["type"], "lane_finish");
    assert_eq!(message["correlation_id"], "rec123");
    assert_eq!(message["lane"], "A1.1");
    assert_eq!(message["output_preview"], "hello world");
    assert_eq!(message["output_length"], 11);
    assert_eq!(message["eval_score"], 0.92);
    assert!(message["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn long_outputs_are_truncated_in_previews() {
    let registry = ConnectionRegistry::shared();
    let bus = EventBus::with_preview_chars(registry.clone(), 5);
    let mut sub = registry.subscribe("rec123");
    let _ = sub.try_next_frame();

    route_webhook(
        &bus,
        &payload(json!({
            "event_type": "lane_finish",
            "correlation_id": "rec123",
            "lane": "C2.1",
            "output": "héllo wörld"
        })),
    );

    let message = event_body(sub.try_next_frame());
    assert_eq!(message["output_preview"], "héllo...");
    assert_eq!(message["output_length"], 11);
}

#[test]
fn unknown_event_type_is_acknowledged_but_not_forwarded() {
    let registry = ConnectionRegistry::shared();
    let bus = EventBus::new(registry.clone());
    let mut sub = registry.subscribe("rec123");
    let _ = sub.try_next_frame();

    let ack = route_webhook(
        &bus,
        &payload(json!({ "event_type": "lane_paused", "correlation_id": "rec123" })),
    );
    assert!(ack.received);
    assert!(!ack.forwarded);
    assert_eq!(ack.event_type, "lane_paused");
    assert!(sub.try_next_frame().is_none());
}

#[test]
fn webhook_without_subscribers_is_forwarded_to_nobody() {
    let bus = EventBus::new(ConnectionRegistry::shared());
    let ack = route_webhook(
        &bus,
        &payload(json!({ "event_type": "publish", "correlation_id": "rec9", "content_type": "linkedin", "output_id": "out1" })),
    );
    assert!(ack.forwarded);
    assert_eq!(ack.delivered, 0);
}

#[tokio::test]
async fn relay_runs_assembly_and_progress_end_to_end() {
    let relay = Relay::new(&RelayConfig::default(), Arc::new(full_store())).unwrap();

    let context = relay.assemble("rec123", None).await.unwrap();
    assert_eq!(context.lane_plan.len(), 1);
    let lane = context.lane_plan[0].lane.clone();

    let mut sub = relay.subscribe("rec123");
    assert_eq!(relay.registry().subscriber_count("rec123"), 1);

    for raw in [
        json!({ "event_type": "lane_start", "correlation_id": "rec123", "lane": lane, "prompt": "Draft the post" }),
        json!({ "event_type": "lane_finish", "correlation_id": "rec123", "lane": lane, "output": "hello world" }),
        json!({ "event_type": "publish", "correlation_id": "rec123", "content_type": "linkedin", "output_id": "out1" }),
        json!({ "event_type": "done", "correlation_id": "rec123", "summary": { "lanes": 1 } }),
    ] {
        let ack = relay.handle_webhook(&payload(raw));
        assert_eq!(ack.delivered, 1);
    }

    let mut types = Vec::new();
    while let Some(frame) = sub.next_frame().await {
        let sse = frame.to_sse();
        assert!(sse.starts_with("data: ") && sse.ends_with("\n\n"));
        types.push(event_body(Some(frame))["type"].as_str().unwrap().to_string());
    }
    assert_eq!(
        types,
        vec!["connected", "lane_start", "lane_finish", "publish", "done"]
    );
    assert_eq!(relay.registry().subscriber_count("rec123"), 0);
}

#[test]
fn relay_rejects_invalid_settings() {
    let mut config = RelayConfig::default();
    config.events.heartbeat_secs = 0;
    assert!(Relay::new(&config, Arc::new(full_store())).is_err());
}

#[test]
fn loosely_typed_fields_are_forwarded() {
    let registry = ConnectionRegistry::shared();
    let bus = EventBus::new(registry.clone());
    let mut sub = registry.subscribe("rec123");
    let _ = sub.try_next_frame();

    let ack = route_webhook(
        &bus,
        &payload(json!({
            "event_type": "publish",
            "correlation_id": "rec123",
            "content_type": "linkedin",
            "output_id": 42
        })),
    );
    assert!(ack.forwarded);
    assert_eq!(event_body(sub.try_next_frame())["output_id"], 42);

    route_webhook(
        &bus,
        &payload(json!({
            "event_type": "lane_error",
            "correlation_id": "rec123",
            "lane": "B1.1",
            "error": { "code": "timeout", "message": "no answer" }
        })),
    );
    assert_eq!(
        event_body(sub.try_next_frame())["error"],
        json!({ "code": "timeout", "message": "no answer" })
    );
}
