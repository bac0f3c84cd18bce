//! HTTP blob store client
//!
//! Talks to the object store's REST surface:
//!
//! | call | request | response |
//! |---|---|---|
//! | `generate_upload_url` | `POST {base}/upload-url` | `{"uploadUrl": "..."}` |
//! | `get_url` | `GET {base}/blobs/{ref}/url` | `{"url": "..."}`, 404 when absent |
//! | `delete` | `DELETE {base}/blobs/{ref}` | 2xx, or 404 when already gone |
//! | health | `GET {base}/health` | 2xx |
//!
//! Every request carries the configured bearer key and is bounded by the
//! client timeout. There are no retries.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, StorageReference};

use crate::ports::BlobStorePort;

const ADAPTER_ID: &str = "http-blob-store";

/// Connection settings for [`HttpBlobStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBlobStoreConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for HttpBlobStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadUrlResponse {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct BlobUrlResponse {
    url: String,
}

/// [`BlobStorePort`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl HttpBlobStore {
    /// Builds the client
    ///
    /// # Errors
    ///
    /// `PortError::Validation` if the API key is not a valid header value,
    /// `PortError::Internal` if the TLS backend cannot be initialised.
    pub fn new(config: HttpBlobStoreConfig) -> Result<Self, PortError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref api_key) = config.api_key {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| PortError::validation("blob store api key is not a valid header value"))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Internal {
                message: "failed to build blob store http client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    fn blob_url(&self, reference: &StorageReference, suffix: &str) -> String {
        format!("{}/blobs/{}{}", self.base_url, reference, suffix)
    }

    fn transport_error(&self, operation: &str, err: reqwest::Error) -> PortError {
        if err.is_timeout() {
            PortError::Timeout {
                operation: operation.to_string(),
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_connect() || err.is_request() {
            PortError::Connection {
                message: format!("{} failed: {}", operation, err),
                source: Some(Box::new(err)),
            }
        } else {
            PortError::Internal {
                message: format!("{} failed: {}", operation, err),
                source: Some(Box::new(err)),
            }
        }
    }

    async fn status_error(operation: &str, response: Response) -> PortError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return PortError::ServiceUnavailable {
                service: "blob store".to_string(),
            };
        }
        PortError::internal(format!("{} returned {}: {}", operation, status.as_u16(), body))
    }
}

impl DomainPort for HttpBlobStore {}

#[async_trait]
impl HealthCheckable for HttpBlobStore {
    async fn health_check(&self) -> HealthCheckResult {
        let started = Instant::now();
        let result = self.client.get(format!("{}/health", self.base_url)).send().await;
        let latency = started.elapsed().as_millis() as u64;
        match result {
            Ok(response) if response.status().is_success() => HealthCheckResult::healthy(ADAPTER_ID, latency),
            Ok(response) => HealthCheckResult::unhealthy(
                ADAPTER_ID,
                latency,
                format!("health endpoint returned {}", response.status().as_u16()),
            ),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency, e.to_string()),
        }
    }
}

#[async_trait]
impl BlobStorePort for HttpBlobStore {
    #[instrument(skip(self))]
    async fn generate_upload_url(&self) -> Result<String, PortError> {
        let response = self
            .client
            .post(format!("{}/upload-url", self.base_url))
            .send()
            .await
            .map_err(|e| self.transport_error("generate upload url", e))?;

        if !response.status().is_success() {
            return Err(Self::status_error("generate upload url", response).await);
        }

        let body: UploadUrlResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error("decode upload url", e))?;
        Ok(body.upload_url)
    }

    #[instrument(skip(self), fields(reference = %reference))]
    async fn get_url(&self, reference: &StorageReference) -> Result<Option<String>, PortError> {
        let response = self
            .client
            .get(self.blob_url(reference, "/url"))
            .send()
            .await
            .map_err(|e| self.transport_error("get blob url", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::status_error("get blob url", response).await);
        }

        let body: BlobUrlResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error("decode blob url", e))?;
        Ok(Some(body.url))
    }

    #[instrument(skip(self), fields(reference = %reference))]
    async fn delete(&self, reference: &StorageReference) -> Result<(), PortError> {
        let response = self
            .client
            .delete(self.blob_url(reference, ""))
            .send()
            .await
            .map_err(|e| self.transport_error("delete blob", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("blob already absent");
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(Self::status_error("delete blob", response).await);
        }
        Ok(())
    }
}
