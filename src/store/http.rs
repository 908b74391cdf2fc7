//! HTTP record store over a REST table API.
//!
//! `GET {base_url}/{table}/{id}` with a bearer token, answering
//! `{"id": "...", "fields": {...}}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::{ApiError, StoreError};
use crate::record::{RecordKind, SourceRecord};
use crate::store::{RecordStore, StoreConfig, TableConfig};

const STORE_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpRecordStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    tables: TableConfig,
}

impl HttpRecordStore {
    pub fn new(config: &StoreConfig) -> Result<Self, ApiError> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| ApiError::ConfigError("store.base_url is not set".to_string()))?;

        let client = Client::builder()
            .connect_timeout(STORE_HTTP_CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            tables: config.tables.clone(),
        })
    }

    fn record_url(&self, kind: RecordKind, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(self.tables.table_for(kind)),
            urlencoding::encode(id)
        )
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn find(&self, kind: RecordKind, id: &str) -> Result<SourceRecord, StoreError> {
        let url = self.record_url(kind, id);
        debug!(kind = kind.as_str(), id, "Fetching record");

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await.map_err(map_http_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(map_status(status, id, body));
        }

        response
            .json::<SourceRecord>()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse record {}: {}", id, e)))
    }
}

fn map_status(status: StatusCode, id: &str, body: String) -> StoreError {
    match status.as_u16() {
        404 => StoreError::NotFound(id.to_string()),
        401 | 403 => StoreError::AuthFailed(body),
        _ => StoreError::RequestFailed(format!("status {}: {}", status, body)),
    }
}

fn map_http_error(error: reqwest::Error) -> StoreError {
    if error.is_timeout() {
        StoreError::RequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        StoreError::RequestFailed(format!("Connection error: {}", error))
    } else {
        StoreError::RequestFailed(format!("HTTP error: {}", error))
    }
}
