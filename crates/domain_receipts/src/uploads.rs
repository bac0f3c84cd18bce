//! Upload targets and download URLs

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use core_kernel::StorageReference;

use crate::error::ReceiptError;
use crate::observer::{LifecycleEvent, LifecycleObserver, TracingObserver};
use crate::ports::BlobStorePort;

/// Where a client should upload, and the reference the blob will have
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub upload_url: String,
    pub storage_reference: StorageReference,
}

/// Mints upload targets and resolves download URLs through the blob store
#[derive(Clone)]
pub struct UploadService {
    blobs: Arc<dyn BlobStorePort>,
    observer: Arc<dyn LifecycleObserver>,
}

impl UploadService {
    pub fn new(blobs: Arc<dyn BlobStorePort>) -> Self {
        Self {
            blobs,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Asks the blob store for an upload URL and extracts its reference
    ///
    /// # Errors
    ///
    /// `UploadIssuanceFailed` when the blob store call fails or the URL it
    /// returns carries no recognizable reference.
    #[instrument(skip(self))]
    pub async fn issue_upload_target(&self) -> Result<UploadTarget, ReceiptError> {
        let upload_url = self
            .blobs
            .generate_upload_url()
            .await
            .map_err(|e| self.issuance_failed(e.to_string()))?;

        let storage_reference = StorageReference::parse(&upload_url)
            .map_err(|_| self.issuance_failed("upload url carries no storage reference".to_string()))?;

        debug!(reference = %storage_reference, "upload target issued");
        Ok(UploadTarget {
            upload_url,
            storage_reference,
        })
    }

    /// Resolves a raw reference to a URL the blob can be fetched from
    ///
    /// # Errors
    ///
    /// - `InvalidReference` if `raw` cannot be normalized
    /// - `BlobNotFound` if the blob store has no such object
    /// - `StorageOperationFailed` if the blob store call fails
    #[instrument(skip(self))]
    pub async fn issue_download_url(&self, raw: &str) -> Result<String, ReceiptError> {
        let reference = StorageReference::parse(raw)?;
        match self.blobs.get_url(&reference).await {
            Ok(Some(url)) => Ok(url),
            Ok(None) => {
                self.observer.record(&LifecycleEvent::DownloadResolutionFailed {
                    reference: reference.clone(),
                    message: "blob not found".to_string(),
                });
                Err(ReceiptError::BlobNotFound { reference })
            }
            Err(e) => {
                self.observer.record(&LifecycleEvent::DownloadResolutionFailed {
                    reference,
                    message: e.to_string(),
                });
                Err(ReceiptError::storage("resolve download url", &e))
            }
        }
    }

    fn issuance_failed(&self, message: String) -> ReceiptError {
        self.observer.record(&LifecycleEvent::UploadIssuanceFailed {
            message: message.clone(),
        });
        ReceiptError::UploadIssuanceFailed(message)
    }
}
