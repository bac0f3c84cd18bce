//! Receipt domain errors
//!
//! Validation and not-found errors are returned to the caller as-is.
//! Record-store failures become `StorageOperationFailed`. Blob-store
//! failures inside delete and cascade operations are not errors at all:
//! they are reported as [`StorageWarning`]s on the operation's report.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::{InvalidReference, LoadId, PortError, StorageReference};

/// Errors that can occur in the receipt domain
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The raw reference could not be normalized
    #[error("Invalid storage reference: {raw:?}")]
    InvalidReference { raw: String },

    #[error("Load not found: {0}")]
    LoadNotFound(LoadId),

    #[error("Receipt not found: {0}")]
    ReceiptNotFound(String),

    /// The reference is well-formed but the blob store has no such object
    #[error("Blob not found: {reference}")]
    BlobNotFound { reference: StorageReference },

    /// The blob store did not hand out a usable upload URL
    #[error("Failed to issue upload target: {0}")]
    UploadIssuanceFailed(String),

    /// A backing store failed in a way that aborts the operation
    #[error("Storage operation failed during {operation}: {message}")]
    StorageOperationFailed { operation: String, message: String },
}

impl ReceiptError {
    pub fn storage(operation: impl Into<String>, error: &PortError) -> Self {
        ReceiptError::StorageOperationFailed {
            operation: operation.into(),
            message: error.to_string(),
        }
    }
}

impl From<InvalidReference> for ReceiptError {
    fn from(err: InvalidReference) -> Self {
        ReceiptError::InvalidReference { raw: err.raw }
    }
}

/// A blob-store failure that was downgraded instead of failing the operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageWarning {
    pub operation: String,
    pub reference: StorageReference,
    pub message: String,
}

impl StorageWarning {
    pub fn blob_delete(reference: &StorageReference, error: &PortError) -> Self {
        Self {
            operation: "delete blob".to_string(),
            reference: reference.clone(),
            message: error.to_string(),
        }
    }
}
