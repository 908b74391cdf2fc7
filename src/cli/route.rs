//! CLI route: one handler per command, each delegating to the relay runtime.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::cli::parse::Commands;
use crate::config::{ConfigLoader, RelayConfig};
use crate::error::ApiError;
use crate::events::WebhookPayload;
use crate::relay::Relay;
use crate::store::{HttpRecordStore, MemoryRecordStore, RecordStore};

pub struct RunContext {
    config: RelayConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self { config })
    }

    pub fn from_config(config: RelayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Assemble { id, lane, records } => {
                let relay = self.relay(records.as_deref())?;
                let context = relay.assemble(id, lane.as_deref()).await?;
                to_pretty_json(&context)
            }
            Commands::Lanes { id, records } => {
                let relay = self.relay(records.as_deref())?;
                let context = relay.assemble(id, None).await?;
                to_pretty_json(&context.lane_plan)
            }
            Commands::Webhook { file } => self.replay_webhook(file),
        }
    }

    fn relay(&self, records: Option<&Path>) -> Result<Relay, ApiError> {
        let store: Arc<dyn RecordStore> = match records {
            Some(path) => {
                info!(fixture = %path.display(), "Using fixture record store");
                Arc::new(MemoryRecordStore::from_fixture(path)?)
            }
            None => Arc::new(HttpRecordStore::new(&self.config.store)?),
        };
        Relay::new(&self.config, store)
    }

    fn replay_webhook(&self, file: &Path) -> Result<String, ApiError> {
        let raw = std::fs::read_to_string(file).map_err(|e| {
            ApiError::InvalidRequest(format!("Failed to read {}: {}", file.display(), e))
        })?;
        let payload: WebhookPayload = serde_json::from_str(&raw).map_err(|e| {
            ApiError::InvalidRequest(format!("Invalid webhook payload: {}", e))
        })?;

        let relay = Relay::new(&self.config, Arc::new(MemoryRecordStore::new()))?;
        let mut subscription = relay.subscribe(&payload.correlation_id);
        let ack = relay.handle_webhook(&payload);

        let mut out = String::new();
        while let Some(frame) = subscription.try_next_frame() {
            out.push_str(&frame.to_sse());
        }
        out.push_str(&format!("# ack: {}", serde_json::to_string(&ack).unwrap_or_default()));
        Ok(out)
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize output: {}", e)))
}
