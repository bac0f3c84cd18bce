//! Receipt records and the merged receipt view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{FieldValue, Filterable, ReceiptId, StorageReference};
use domain_loads::Load;

/// Where a listed receipt comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptKind {
    /// Derived from a load's `receipt_storage_id`
    Load,
    /// A ledger record with no load
    Standalone,
}

/// A receipt uploaded before any load existed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandaloneReceipt {
    pub id: ReceiptId,
    pub storage_reference: StorageReference,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the standalone ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStandaloneReceipt {
    pub storage_reference: StorageReference,
    pub created_at: DateTime<Utc>,
}

/// Named ledger fields usable in record-store filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiptField {
    StorageReference,
    CreatedAt,
}

impl Filterable<ReceiptField> for StandaloneReceipt {
    fn field_value(&self, field: ReceiptField) -> FieldValue {
        match field {
            ReceiptField::StorageReference => (&self.storage_reference).into(),
            ReceiptField::CreatedAt => self.created_at.into(),
        }
    }
}

/// One entry of the merged receipt listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptView {
    pub storage_reference: StorageReference,
    pub created_at: DateTime<Utc>,
    pub kind: ReceiptKind,
}

impl ReceiptView {
    /// Derives the view of a load's attached receipt, if it has one
    pub fn from_load(load: &Load) -> Option<Self> {
        load.receipt_storage_id.as_ref().map(|reference| Self {
            storage_reference: reference.clone(),
            created_at: load.created_at,
            kind: ReceiptKind::Load,
        })
    }
}

impl From<StandaloneReceipt> for ReceiptView {
    fn from(receipt: StandaloneReceipt) -> Self {
        Self {
            storage_reference: receipt.storage_reference,
            created_at: receipt.created_at,
            kind: ReceiptKind::Standalone,
        }
    }
}
