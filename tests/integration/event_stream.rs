use std::sync::Arc;
use std::time::Duration;

use context_relay::events::{
    spawn_heartbeat, ConnectionRegistry, EmitReport, EventBus, EventType, StreamFrame,
    Subscription,
};
use serde_json::{json, Value};

fn body(frame: StreamFrame) -> Value {
    match frame {
        StreamFrame::Event { body, .. } => serde_json::from_str(&body).unwrap(),
        StreamFrame::Heartbeat => panic!("unexpected heartbeat"),
    }
}

fn drain(sub: &mut Subscription) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Some(frame) = sub.try_next_frame() {
        frames.push(body(frame));
    }
    frames
}

#[test]
fn subscribers_see_identical_order() {
    let registry = ConnectionRegistry::shared();
    let bus = EventBus::new(registry.clone());
    let mut first = registry.subscribe("rec123");
    let mut second = registry.subscribe("rec123");

    for lane in ["A1.1", "A2.1", "A3.1"] {
        bus.emit("rec123", "lane_start", &json!({ "lane": lane, "prompt": "Write" }));
    }

    let lanes = |frames: Vec<Value>| -> Vec<Value> {
        frames
            .into_iter()
            .filter(|f| f["type"] == "lane_start")
            .map(|f| f["lane"].clone())
            .collect()
    };
    let seen_first = lanes(drain(&mut first));
    let seen_second = lanes(drain(&mut second));
    assert_eq!(seen_first, vec![json!("A1.1"), json!("A2.1"), json!("A3.1")]);
    assert_eq!(seen_first, seen_second);
}

#[test]
fn concurrent_emitters_keep_a_single_order() {
    let registry = ConnectionRegistry::shared();
    let bus = Arc::new(EventBus::new(registry.clone()));
    let mut first = registry.subscribe("rec123");
    let mut second = registry.subscribe("rec123");

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let bus = bus.clone();
            std::thread::spawn(move || {
                for step in 0..25 {
                    bus.emit(
                        "rec123",
                        "progress",
                        &json!({ "data": { "worker": worker, "step": step } }),
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let first = drain(&mut first);
    let second = drain(&mut second);
    assert_eq!(first.len(), 101);
    let data = |frames: &[Value]| -> Vec<Value> {
        frames.iter().map(|f| f["data"].clone()).collect()
    };
    assert_eq!(data(&first), data(&second));
}

#[test]
fn late_subscriber_gets_greeting_but_no_backlog() {
    let registry = ConnectionRegistry::shared();
    let bus = EventBus::new(registry.clone());
    let mut early = registry.subscribe("rec123");
    bus.emit("rec123", "lane_start", &json!({ "lane": "A1.1" }));

    let mut late = registry.subscribe("rec123");
    let frames = drain(&mut late);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["type"], "connected");
    assert_eq!(frames[0]["correlation_id"], "rec123");
    assert_eq!(frames[0]["message"], "connected");

    assert_eq!(drain(&mut early).len(), 2);
}

#[test]
fn emit_without_subscribers_is_a_no_op() {
    let registry = ConnectionRegistry::shared();
    let bus = EventBus::new(registry.clone());
    assert_eq!(
        bus.emit("nobody", "progress", &json!({ "data": 1 })),
        EmitReport::NoSubscribers
    );
    assert!(registry.active_correlation_ids().is_empty());

    // Nothing was buffered for the id.
    let mut sub = registry.subscribe("nobody");
    assert_eq!(drain(&mut sub).len(), 1);
}

#[test]
fn streams_are_isolated_per_correlation_id() {
    let registry = ConnectionRegistry::shared();
    let bus = EventBus::new(registry.clone());
    let mut one = registry.subscribe("rec1");
    let mut two = registry.subscribe("rec2");

    bus.emit("rec1", "lane_error", &json!({ "lane": "B1.1", "error": "boom" }));

    let one = drain(&mut one);
    assert_eq!(one.len(), 2);
    assert_eq!(one[1]["error"], "boom");
    assert_eq!(drain(&mut two).len(), 1);
    assert_eq!(registry.active_correlation_ids(), vec!["rec1", "rec2"]);
}

#[tokio::test]
async fn done_event_ends_the_stream() {
    let registry = ConnectionRegistry::shared();
    let bus = EventBus::new(registry.clone());
    let mut sub = registry.subscribe("rec123");

    bus.emit("rec123", "done", &json!({ "summary": { "lanes": 1 } }));
    bus.emit("rec123", "progress", &json!({ "data": "late" }));

    let connected = sub.next_frame().await.unwrap();
    assert!(!connected.is_done());
    let done = sub.next_frame().await.unwrap();
    assert!(done.is_done());
    assert_eq!(body(done)["summary"], json!({ "lanes": 1 }));
    assert!(sub.next_frame().await.is_none());
    assert_eq!(registry.subscriber_count("rec123"), 0);
}

#[test]
fn dropping_a_subscription_only_cancels_itself() {
    let registry = ConnectionRegistry::shared();
    let bus = EventBus::new(registry.clone());
    let kept = registry.subscribe("rec123");
    let dropped = registry.subscribe("rec123");
    assert_eq!(registry.subscriber_count("rec123"), 2);

    drop(dropped);
    assert_eq!(registry.subscriber_count("rec123"), 1);
    assert_eq!(
        bus.emit("rec123", "progress", &json!({ "data": 1 })),
        EmitReport::Delivered {
            delivered: 1,
            failed: 0
        }
    );

    drop(kept);
    assert!(registry.active_correlation_ids().is_empty());
}

#[test]
fn external_connected_events_are_rejected() {
    let registry = ConnectionRegistry::shared();
    let bus = EventBus::new(registry.clone());
    let mut sub = registry.subscribe("rec123");
    let _ = sub.try_next_frame();

    assert!(matches!(
        bus.emit_typed("rec123", EventType::Connected, &json!({})),
        EmitReport::Rejected { .. }
    ));
    assert!(sub.try_next_frame().is_none());
}

#[tokio::test(start_paused = true)]
async fn heartbeats_reach_idle_streams() {
    let registry = ConnectionRegistry::shared();
    let mut sub = registry.subscribe("rec123");
    let _ = sub.next_frame().await;

    let handle = spawn_heartbeat(registry.clone(), Duration::from_secs(15));
    tokio::time::sleep(Duration::from_secs(16)).await;

    let frame = sub.next_frame().await.unwrap();
    assert_eq!(frame, StreamFrame::Heartbeat);
    assert_eq!(frame.to_sse(), ": heartbeat\n\n");
    handle.abort();
}
