//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

use crate::events::{DEFAULT_HEARTBEAT_SECS, DEFAULT_PREVIEW_CHARS};

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("routing.provider", "openai")?
        .set_default("routing.model", "gpt-4o")?
        .set_default("events.heartbeat_secs", DEFAULT_HEARTBEAT_SECS)?
        .set_default("events.preview_chars", DEFAULT_PREVIEW_CHARS as u64)?
        .set_default("defaults.destination", "default")
}
