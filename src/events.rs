//! Progress events: catalog, subscriber registry, fan-out bus, webhook intake,
//! and stream heartbeats.

pub mod bus;
pub mod heartbeat;
pub mod registry;
pub mod sink;
pub mod types;
pub mod webhook;

use serde::{Deserialize, Serialize};

pub use bus::{EmitReport, EventBus};
pub use heartbeat::spawn_heartbeat;
pub use registry::{ConnectionRegistry, Subscription};
pub use sink::{ChannelSink, EventSink, SinkId, StreamFrame};
pub use types::{EventType, ProgressEvent};
pub use webhook::{route_webhook, WebhookAck, WebhookPayload};

pub const DEFAULT_PREVIEW_CHARS: usize = 200;
pub const DEFAULT_HEARTBEAT_SECS: u64 = 15;

/// Event stream settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Seconds between heartbeats on idle connections
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,

    /// Maximum characters of prompt/output text carried in previews
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_heartbeat_secs() -> u64 {
    DEFAULT_HEARTBEAT_SECS
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            heartbeat_secs: default_heartbeat_secs(),
            preview_chars: default_preview_chars(),
        }
    }
}
