//! Configuration System
//!
//! Layered configuration for assembly routing, the record store, event
//! streaming, alias overrides, and logging. Sources are merged in order:
//! built-in defaults, global file, workspace files, then `CTXRELAY__*`
//! environment variables.

use crate::aliases::AliasConfig;
use crate::context::{DefaultsConfig, RoutingConfig};
use crate::error::ApiError;
use crate::events::EventsConfig;
use crate::logging::LoggingConfig;
use crate::store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod merge;
mod sources;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub events: EventsConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub aliases: AliasConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RelayConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.routing.provider.trim().is_empty() {
            errors.push("routing.provider cannot be empty".to_string());
        }
        if self.routing.model.trim().is_empty() {
            errors.push("routing.model cannot be empty".to_string());
        }
        for (name, url) in [
            ("routing.webhook_url", &self.routing.webhook_url),
            ("routing.event_stream_base_url", &self.routing.event_stream_base_url),
            ("store.base_url", &self.store.base_url),
        ] {
            if let Some(url) = url {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    errors.push(format!("{} must be an http(s) URL: {}", name, url));
                }
            }
        }
        if self.events.heartbeat_secs == 0 {
            errors.push("events.heartbeat_secs must be greater than zero".to_string());
        }
        if self.events.preview_chars == 0 {
            errors.push("events.preview_chars must be greater than zero".to_string());
        }
        if self.defaults.destination.trim().is_empty() {
            errors.push("defaults.destination cannot be empty".to_string());
        }
        for (key, aliases) in self.aliases.prepend.iter().chain(self.aliases.replace.iter()) {
            if aliases.iter().any(|a| a.is_empty()) {
                errors.push(format!("aliases.{}: alias names cannot be empty", key));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// [`RelayConfig::validate`] folded into a single configuration error.
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            ))
        })
    }
}

/// Loads [`RelayConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace root.
    pub fn load(workspace_root: &Path) -> Result<RelayConfig, ApiError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = sources::environment::add_to_builder(builder);
        Self::finish(builder)
    }

    /// Load configuration from one explicit file (plus defaults and environment).
    pub fn load_from_file(path: &Path) -> Result<RelayConfig, ApiError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(config::File::from(path).required(true));
        let builder = sources::environment::add_to_builder(builder);
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<RelayConfig, ApiError> {
        let config: RelayConfig = builder.build()?.try_deserialize()?;
        config.ensure_valid()?;
        Ok(config)
    }
}
