//! Context assembler: fetches a primary record and its linked records and
//! composes them into a [`UnifiedContext`].
//!
//! Only the primary fetch is fatal. Linked fetches run concurrently, each
//! outcome is captured as a [`LinkedFetch`], and a failed link degrades its
//! section to defaults instead of failing the request.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, error, info, warn};

use crate::aliases::{keys, AliasCatalog};
use crate::context::idempotency::idempotency_key;
use crate::context::sections::SectionBuilder;
use crate::context::settings::{DefaultsConfig, RoutingConfig};
use crate::context::types::{ContextMeta, UnifiedContext, SCHEMA_VERSION};
use crate::error::{ApiError, StoreError};
use crate::lanes::LanePlanner;
use crate::record::{RecordKind, SourceRecord};
use crate::resolve::resolve_link;
use crate::store::RecordStore;

/// Outcome of one linked-record fetch.
#[derive(Debug)]
pub enum LinkedFetch {
    Found(SourceRecord),
    /// The primary record carries no link for this kind.
    NotLinked,
    Failed { id: String, error: StoreError },
}

impl LinkedFetch {
    pub fn record(&self) -> Option<&SourceRecord> {
        match self {
            LinkedFetch::Found(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LinkedFetch::Failed { .. })
    }
}

pub struct ContextAssembler {
    store: Arc<dyn RecordStore>,
    catalog: Arc<AliasCatalog>,
    routing: RoutingConfig,
    defaults: DefaultsConfig,
}

impl ContextAssembler {
    pub fn new(store: Arc<dyn RecordStore>, catalog: Arc<AliasCatalog>) -> Self {
        Self {
            store,
            catalog,
            routing: RoutingConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }

    pub fn with_settings(
        store: Arc<dyn RecordStore>,
        catalog: Arc<AliasCatalog>,
        routing: RoutingConfig,
        defaults: DefaultsConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            routing,
            defaults,
        }
    }

    pub fn catalog(&self) -> &AliasCatalog {
        &self.catalog
    }

    /// Assemble the unified context for one unit of work.
    pub async fn assemble(
        &self,
        correlation_id: &str,
        lane_id: Option<&str>,
    ) -> Result<UnifiedContext, ApiError> {
        if correlation_id.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "correlation id cannot be empty".to_string(),
            ));
        }

        let primary = self
            .store
            .find(RecordKind::Primary, correlation_id)
            .await
            .map_err(|source| {
                error!(correlation_id, error = %source, "Primary record fetch failed");
                ApiError::AssemblyFailed {
                    correlation_id: correlation_id.to_string(),
                    source,
                }
            })?;

        let link = |key: &str| {
            resolve_link(Some(&primary), self.catalog.aliases(key)).map(str::to_string)
        };
        let workflow_id = link(keys::WORKFLOW_LINK);
        let entity_id = link(keys::ENTITY_LINK);
        let content_type_id = link(keys::CONTENT_TYPE_LINK);

        let (workflow, entity, content_type) = futures::join!(
            self.fetch_linked(correlation_id, RecordKind::Workflow, workflow_id.as_deref()),
            self.fetch_linked(correlation_id, RecordKind::Entity, entity_id.as_deref()),
            self.fetch_linked(
                correlation_id,
                RecordKind::ContentType,
                content_type_id.as_deref()
            ),
        );

        let sections = SectionBuilder::new(&self.catalog);
        let lane_plan = LanePlanner::new(&self.catalog).plan(&primary, workflow.record());
        let content_type_contract = sections.content_type(content_type.record(), &self.defaults);
        let rules = sections.rules(&content_type_contract, workflow.record());

        let context = UnifiedContext {
            meta: ContextMeta {
                schema_version: SCHEMA_VERSION.to_string(),
                correlation_id: correlation_id.to_string(),
                workflow_id,
                content_type_id,
                entity_id,
                lane_id: lane_id.map(str::to_string),
                idempotency_key: idempotency_key(correlation_id, lane_id),
                generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
            routing: sections.routing(correlation_id, workflow.record(), &self.routing),
            entity_context: sections.entity(entity.record()),
            audience_context: sections.audience(&primary, entity.record()),
            content_type: content_type_contract,
            lane_plan,
            rules,
            user_input: sections.user_input(&primary),
        };

        let degraded = [&workflow, &entity, &content_type]
            .iter()
            .filter(|f| f.is_failed())
            .count();
        info!(
            correlation_id,
            lanes = context.lane_plan.len(),
            rules = context.rules.len(),
            degraded,
            "Unified context assembled"
        );
        Ok(context)
    }

    async fn fetch_linked(
        &self,
        correlation_id: &str,
        kind: RecordKind,
        id: Option<&str>,
    ) -> LinkedFetch {
        let Some(id) = id else {
            debug!(correlation_id, kind = kind.as_str(), "No linked record");
            return LinkedFetch::NotLinked;
        };
        match self.store.find(kind, id).await {
            Ok(record) => LinkedFetch::Found(record),
            Err(error) => {
                warn!(
                    correlation_id,
                    kind = kind.as_str(),
                    linked_id = id,
                    error = %error,
                    "Linked record fetch failed; using defaults"
                );
                LinkedFetch::Failed {
                    id: id.to_string(),
                    error,
                }
            }
        }
    }
}
