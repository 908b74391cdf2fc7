//! Relay runtime: wires the assembler, connection registry, and event bus from
//! one configuration. Construct once and share; nothing here is global.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::aliases::AliasCatalog;
use crate::config::RelayConfig;
use crate::context::{ContextAssembler, UnifiedContext};
use crate::error::ApiError;
use crate::events::{
    route_webhook, spawn_heartbeat, ConnectionRegistry, EventBus, Subscription, WebhookAck,
    WebhookPayload,
};
use crate::store::RecordStore;

#[derive(Clone)]
pub struct Relay {
    assembler: Arc<ContextAssembler>,
    registry: Arc<ConnectionRegistry>,
    bus: Arc<EventBus>,
    heartbeat_every: Duration,
}

impl Relay {
    /// Build a relay from a configuration, rejecting settings the runtime
    /// cannot honour (a zero heartbeat interval, for one).
    pub fn new(config: &RelayConfig, store: Arc<dyn RecordStore>) -> Result<Self, ApiError> {
        config.ensure_valid()?;

        let catalog = Arc::new(AliasCatalog::with_config(&config.aliases));
        let assembler = Arc::new(ContextAssembler::with_settings(
            store,
            catalog,
            config.routing.clone(),
            config.defaults.clone(),
        ));
        let registry = ConnectionRegistry::shared();
        let bus = Arc::new(EventBus::with_preview_chars(
            registry.clone(),
            config.events.preview_chars,
        ));
        Ok(Self {
            assembler,
            registry,
            bus,
            heartbeat_every: Duration::from_secs(config.events.heartbeat_secs),
        })
    }

    pub async fn assemble(
        &self,
        correlation_id: &str,
        lane_id: Option<&str>,
    ) -> Result<UnifiedContext, ApiError> {
        self.assembler.assemble(correlation_id, lane_id).await
    }

    pub fn subscribe(&self, correlation_id: &str) -> Subscription {
        self.registry.subscribe(correlation_id)
    }

    pub fn handle_webhook(&self, payload: &WebhookPayload) -> WebhookAck {
        route_webhook(&self.bus, payload)
    }

    /// Start heartbeats for every live connection. Must be called inside a
    /// Tokio runtime.
    pub fn start_heartbeat(&self) -> JoinHandle<()> {
        spawn_heartbeat(self.registry.clone(), self.heartbeat_every)
    }

    pub fn assembler(&self) -> &ContextAssembler {
        &self.assembler
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}
