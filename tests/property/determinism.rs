//! Property-based tests for determinism guarantees

use context_relay::aliases::AliasCatalog;
use context_relay::context::idempotency_key;
use context_relay::lanes::{plan_lanes, LANES, SUB_LANES};
use context_relay::record::SourceRecord;
use proptest::prelude::*;

/// Same inputs always produce the same key
#[test]
fn test_idempotency_key_is_pure() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(any::<String>(), proptest::option::of(any::<String>())),
            |(correlation_id, lane_id)| {
                let first = idempotency_key(&correlation_id, lane_id.as_deref());
                let second = idempotency_key(&correlation_id, lane_id.as_deref());
                assert_eq!(first, second);
                assert_eq!(first.len(), 64);
                Ok(())
            },
        )
        .unwrap();
}

/// Distinct pairs do not collide
#[test]
fn test_idempotency_key_distinct_pairs() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                "[a-zA-Z0-9]{1,12}",
                proptest::option::of("[A-J][1-5]\\.1"),
                "[a-zA-Z0-9]{1,12}",
                proptest::option::of("[A-J][1-5]\\.1"),
            ),
            |(id1, lane1, id2, lane2)| {
                prop_assume!((&id1, &lane1) != (&id2, &lane2));
                let key1 = idempotency_key(&id1, lane1.as_deref());
                let key2 = idempotency_key(&id2, lane2.as_deref());
                assert_ne!(key1, key2);
                Ok(())
            },
        )
        .unwrap();
}

fn record_from_flags(toggles: &[bool], prompts: &[bool]) -> SourceRecord {
    let mut record = SourceRecord::new("rec");
    for (i, lane) in LANES.iter().enumerate() {
        record = record.with_field(format!("Branch {lane}"), toggles[i]);
        for (j, suffix) in SUB_LANES.iter().enumerate() {
            if prompts[i * SUB_LANES.len() + j] {
                record = record.with_field(format!("{lane}{suffix} Prompt"), vec!["recP"]);
            }
        }
    }
    record
}

/// Planning is deterministic and exactly matches toggle AND prompt
#[test]
fn test_lane_plan_matches_toggles_and_prompts() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let catalog = AliasCatalog::builtin();
    let workflow = SourceRecord::new("recW");

    runner
        .run(
            &(
                proptest::collection::vec(any::<bool>(), LANES.len()),
                proptest::collection::vec(any::<bool>(), LANES.len() * SUB_LANES.len()),
            ),
            |(toggles, prompts)| {
                let primary = record_from_flags(&toggles, &prompts);
                let plan = plan_lanes(&catalog, &primary, Some(&workflow));
                assert_eq!(plan, plan_lanes(&catalog, &primary, Some(&workflow)));

                let mut expected = Vec::new();
                for (i, lane) in LANES.iter().enumerate() {
                    for (j, suffix) in SUB_LANES.iter().enumerate() {
                        if toggles[i] && prompts[i * SUB_LANES.len() + j] {
                            expected.push(format!("{lane}{suffix}"));
                        }
                    }
                }
                let lanes: Vec<String> = plan.iter().map(|a| a.lane.clone()).collect();
                assert_eq!(lanes, expected);
                assert!(plan.iter().all(|a| a.enabled));

                // No workflow, no plan.
                assert!(plan_lanes(&catalog, &primary, None).is_empty());
                Ok(())
            },
        )
        .unwrap();
}
