use crate::api::models::{
    BulkImportCollectionRequest, Collection, ErrorResponse, ImportSummary, WireRecord,
};
use crate::import::DistributionMode;
use reqwest::{Client, Error as ReqwestError, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),
    #[error("API error: {message} (code: {status})")]
    Status { status: u16, message: String },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Inventory backend operations used by the import flow
/// (allows mocking for tests)
#[async_trait::async_trait]
pub trait InventoryBackend: Send + Sync {
    /// Put every record into one container of the collection
    async fn import_to_container(
        &self,
        user_id: &str,
        collection_id: &str,
        container_id: &str,
        records: Vec<WireRecord>,
    ) -> Result<ImportSummary, ApiError>;

    /// Let the backend place records across the collection's containers
    async fn distribute_to_collection(
        &self,
        user_id: &str,
        collection_id: &str,
        records: Vec<WireRecord>,
        mode: DistributionMode,
    ) -> Result<ImportSummary, ApiError>;

    async fn get_collection(
        &self,
        user_id: &str,
        collection_id: &str,
    ) -> Result<Collection, ApiError>;
}

/// REST client for the inventory backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
        })
    }

    fn collection_url(&self, user_id: &str, collection_id: &str) -> String {
        format!(
            "{}/accounts/{}/collections/{}",
            self.base_url,
            urlencoding::encode(user_id),
            urlencoding::encode(collection_id)
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn post_import(
        &self,
        user_id: &str,
        request: BulkImportCollectionRequest,
    ) -> Result<ImportSummary, ApiError> {
        let url = format!(
            "{}/import",
            self.collection_url(user_id, &request.collection_id)
        );
        info!(
            "Sending import request to {} ({} records, mode {})",
            url,
            request.data.len(),
            request.distribution_mode
        );

        let response = self
            .authorize(self.client.post(&url))
            .json(&request)
            .send()
            .await?;

        let summary: ImportSummary = decode_response(response).await?;
        info!(
            "Import finished: {} imported, {} failed, {} total",
            summary.imported, summary.failed, summary.total
        );
        Ok(summary)
    }
}

#[async_trait::async_trait]
impl InventoryBackend for ApiClient {
    async fn import_to_container(
        &self,
        user_id: &str,
        collection_id: &str,
        container_id: &str,
        records: Vec<WireRecord>,
    ) -> Result<ImportSummary, ApiError> {
        let request = BulkImportCollectionRequest::new(
            collection_id,
            Some(container_id),
            DistributionMode::Target,
            records,
        );
        self.post_import(user_id, request).await
    }

    async fn distribute_to_collection(
        &self,
        user_id: &str,
        collection_id: &str,
        records: Vec<WireRecord>,
        mode: DistributionMode,
    ) -> Result<ImportSummary, ApiError> {
        let request = BulkImportCollectionRequest::new(collection_id, None, mode, records);
        self.post_import(user_id, request).await
    }

    async fn get_collection(
        &self,
        user_id: &str,
        collection_id: &str,
    ) -> Result<Collection, ApiError> {
        let url = self.collection_url(user_id, collection_id);
        debug!("Fetching collection from {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        decode_response(response).await
    }
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    decode_body(status, &body)
}

/// Decode a JSON body, turning non-2xx statuses into `ApiError::Status`
fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(body)?)
}
