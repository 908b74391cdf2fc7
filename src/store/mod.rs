//! Record Store
//!
//! Read-only access to the external relational store that owns source
//! records. The assembler only needs `find`; backends decide how a
//! [`RecordKind`] maps onto their tables.

pub mod http;
pub mod memory;

pub use http::HttpRecordStore;
pub use memory::MemoryRecordStore;

use crate::error::StoreError;
use crate::record::{RecordKind, SourceRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Record store interface
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one record by id. Missing records are `StoreError::NotFound`.
    async fn find(&self, kind: RecordKind, id: &str) -> Result<SourceRecord, StoreError>;
}

/// Table names per record kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_primary_table")]
    pub primary: String,
    #[serde(default = "default_workflow_table")]
    pub workflow: String,
    #[serde(default = "default_entity_table")]
    pub entity: String,
    #[serde(default = "default_content_type_table")]
    pub content_type: String,
}

impl TableConfig {
    pub fn table_for(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Primary => &self.primary,
            RecordKind::Workflow => &self.workflow,
            RecordKind::Entity => &self.entity,
            RecordKind::ContentType => &self.content_type,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_table(),
            workflow: default_workflow_table(),
            entity: default_entity_table(),
            content_type: default_content_type_table(),
        }
    }
}

fn default_primary_table() -> String {
    "Requests".to_string()
}

fn default_workflow_table() -> String {
    "Workflows".to_string()
}

fn default_entity_table() -> String {
    "Entities".to_string()
}

fn default_content_type_table() -> String {
    "Content Types".to_string()
}

/// Connection settings for the HTTP record store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the table API, e.g. `https://api.example.com/v0/<base>`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub tables: TableConfig,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            tables: TableConfig::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
