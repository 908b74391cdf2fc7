//! In-memory record store for fixtures and tests.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;

use crate::error::{ApiError, StoreError};
use crate::record::{RecordKind, SourceRecord};
use crate::store::RecordStore;

/// Records keyed by id. Kinds share one id space, matching a store whose
/// record ids are globally unique.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<String, SourceRecord>>,
    failing: RwLock<HashMap<String, String>>,
}

#[derive(Deserialize)]
struct Fixture {
    records: Vec<SourceRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = SourceRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Load a fixture file of the form `{"records": [{"id": ..., "fields": {...}}]}`.
    pub fn from_fixture(path: &Path) -> Result<Self, ApiError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ApiError::InvalidRequest(format!("Failed to read fixture {}: {}", path.display(), e))
        })?;
        let fixture: Fixture = serde_json::from_str(&raw).map_err(|e| {
            ApiError::InvalidRequest(format!("Failed to parse fixture {}: {}", path.display(), e))
        })?;
        Ok(Self::with_records(fixture.records))
    }

    pub fn insert(&self, record: SourceRecord) {
        self.records.write().insert(record.id.clone(), record);
    }

    /// Make lookups of `id` fail with a request error.
    pub fn fail_on(&self, id: impl Into<String>, message: impl Into<String>) {
        self.failing.write().insert(id.into(), message.into());
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find(&self, _kind: RecordKind, id: &str) -> Result<SourceRecord, StoreError> {
        if let Some(message) = self.failing.read().get(id) {
            return Err(StoreError::RequestFailed(message.clone()));
        }
        self.records
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
