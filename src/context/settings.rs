//! Assembly settings: routing targets and section defaults.

use serde::{Deserialize, Serialize};

/// Where the execution engine runs and reports back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Provider used when the workflow record names none
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model used when the workflow record names none
    #[serde(default = "default_model")]
    pub model: String,

    /// Progress webhook the engine should post to
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Base URL of the event stream; the correlation id is appended
    #[serde(default)]
    pub event_stream_base_url: Option<String>,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            webhook_url: None,
            event_stream_base_url: None,
        }
    }
}

impl RoutingConfig {
    pub fn event_stream_url(&self, correlation_id: &str) -> Option<String> {
        self.event_stream_base_url
            .as_ref()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), correlation_id))
    }
}

/// Defaults for sections whose source record is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_destination")]
    pub destination: String,
}

fn default_destination() -> String {
    "default".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            destination: default_destination(),
        }
    }
}
