//! API error handling
//!
//! | error | status | `error` code |
//! |---|---|---|
//! | malformed storage reference | 422 | `invalid_reference` |
//! | load field validation | 422 | `validation_error` |
//! | unknown load or receipt | 404 | `not_found` |
//! | reference with no blob | 404 | `blob_not_found` |
//! | blob store gave no upload URL | 502 | `upload_issuance_failed` |
//! | record or blob store failure | 500 | `storage_operation_failed` |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use domain_loads::LoadError;
use domain_receipts::ReceiptError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {message}")]
    Validation { message: String, details: Vec<String> },

    #[error("Invalid storage reference: {raw:?}")]
    InvalidReference { raw: String },

    #[error("Blob not found: {0}")]
    BlobNotFound(String),

    #[error("Upload issuance failed: {0}")]
    UploadIssuance(String),

    #[error("Storage operation failed: {0}")]
    Storage(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    /// The offending input, for `invalid_reference`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            ApiError::InvalidReference { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_reference"),
            ApiError::BlobNotFound(_) => (StatusCode::NOT_FOUND, "blob_not_found"),
            ApiError::UploadIssuance(_) => (StatusCode::BAD_GATEWAY, "upload_issuance_failed"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_operation_failed"),
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let message = self.to_string();
        let body = match self {
            ApiError::Validation { details, .. } => ErrorResponse {
                error: error_type.to_string(),
                message,
                details: Some(details),
                raw: None,
            },
            ApiError::InvalidReference { raw } => ErrorResponse {
                error: error_type.to_string(),
                message,
                details: None,
                raw: Some(raw),
            },
            _ => ErrorResponse {
                error: error_type.to_string(),
                message,
                details: None,
                raw: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<LoadError> for ApiError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::LoadNotFound(id) => ApiError::NotFound(format!("Load {}", id)),
            LoadError::Validation(details) => ApiError::Validation {
                message: details.join("; "),
                details,
            },
            LoadError::Storage(e) => ApiError::Storage(e.to_string()),
        }
    }
}

impl From<ReceiptError> for ApiError {
    fn from(err: ReceiptError) -> Self {
        match err {
            ReceiptError::InvalidReference { raw } => ApiError::InvalidReference { raw },
            ReceiptError::LoadNotFound(id) => ApiError::NotFound(format!("Load {}", id)),
            ReceiptError::ReceiptNotFound(id) => ApiError::NotFound(format!("Receipt {}", id)),
            ReceiptError::BlobNotFound { reference } => ApiError::BlobNotFound(reference.into_inner()),
            ReceiptError::UploadIssuanceFailed(message) => ApiError::UploadIssuance(message),
            e @ ReceiptError::StorageOperationFailed { .. } => ApiError::Storage(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{LoadId, StorageReference};

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (ReceiptError::InvalidReference { raw: "x".into() }.into(), StatusCode::UNPROCESSABLE_ENTITY),
            (ReceiptError::LoadNotFound(LoadId::new()).into(), StatusCode::NOT_FOUND),
            (
                ReceiptError::BlobNotFound {
                    reference: StorageReference::parse("ab12ab12-0000-4fff-8fff-abcdefabcdef").unwrap(),
                }
                .into(),
                StatusCode::NOT_FOUND,
            ),
            (ReceiptError::UploadIssuanceFailed("none".into()).into(), StatusCode::BAD_GATEWAY),
            (
                ReceiptError::StorageOperationFailed {
                    operation: "delete load".into(),
                    message: "reset".into(),
                }
                .into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (LoadError::Validation(vec!["weight: must_be_positive".into()]).into(), StatusCode::UNPROCESSABLE_ENTITY),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
