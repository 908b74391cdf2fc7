//! Idempotency key computation
//!
//! key = hash("correlation:" || len || correlation_id || lane part)
//!
//! Each component is length-prefixed so distinct `(correlation_id, lane_id)`
//! pairs never produce the same hash input.

use blake3::Hasher;

pub fn idempotency_key(correlation_id: &str, lane_id: Option<&str>) -> String {
    let mut hasher = Hasher::new();

    hasher.update(b"correlation:");
    hasher.update(&(correlation_id.len() as u64).to_le_bytes());
    hasher.update(correlation_id.as_bytes());

    match lane_id {
        Some(lane) => {
            hasher.update(b"lane:");
            hasher.update(&(lane.len() as u64).to_le_bytes());
            hasher.update(lane.as_bytes());
        }
        None => {
            hasher.update(b"lane-none");
        }
    }

    hex::encode(hasher.finalize().as_bytes())
}
