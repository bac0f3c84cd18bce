//! Receipt, upload and download DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ReceiptId, StorageReference};
use domain_receipts::{DeletionReport, ReceiptKind, ReceiptView, StorageWarning};

/// One entry of `GET /receipts`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptEntry {
    pub storage_reference: StorageReference,
    pub created_at: DateTime<Utc>,
    pub kind: ReceiptKind,
}

impl From<ReceiptView> for ReceiptEntry {
    fn from(view: ReceiptView) -> Self {
        Self {
            storage_reference: view.storage_reference,
            created_at: view.created_at,
            kind: view.kind,
        }
    }
}

/// Body of `POST /receipts` and `POST /downloads`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageReferenceRequest {
    pub storage_reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReceiptResponse {
    pub success: bool,
    pub storage_reference: StorageReference,
    pub receipt_id: ReceiptId,
}

/// Query string of `GET /receipts/new`
#[derive(Debug, Clone, Deserialize)]
pub struct NewReceiptsParams {
    pub since: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReceiptResponse {
    pub success: bool,
    pub storage_reference: StorageReference,
    pub blob_deleted: bool,
    pub loads_cleared: usize,
    pub receipts_removed: usize,
    pub warnings: Vec<StorageWarning>,
}

impl From<DeletionReport> for DeleteReceiptResponse {
    fn from(report: DeletionReport) -> Self {
        Self {
            success: true,
            storage_reference: report.reference,
            blob_deleted: report.blob_deleted,
            loads_cleared: report.loads_cleared,
            receipts_removed: report.receipts_removed,
            warnings: report.warnings,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub url: String,
}
