//! Receipt registry
//!
//! Load-attached receipts are not stored anywhere on their own; they are
//! derived from loads that carry a `receipt_storage_id`. The registry merges
//! them with the standalone ledger.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};

use core_kernel::{Filter, ReceiptId, StorageReference};
use domain_loads::{LoadField, LoadStorePort};

use crate::error::ReceiptError;
use crate::ports::ReceiptLedgerPort;
use crate::receipt::{NewStandaloneReceipt, ReceiptView, StandaloneReceipt};

/// Merged view over load-attached and standalone receipts
#[derive(Clone)]
pub struct ReceiptRegistry {
    loads: Arc<dyn LoadStorePort>,
    ledger: Arc<dyn ReceiptLedgerPort>,
}

impl ReceiptRegistry {
    pub fn new(loads: Arc<dyn LoadStorePort>, ledger: Arc<dyn ReceiptLedgerPort>) -> Self {
        Self { loads, ledger }
    }

    /// Lists every receipt, load-attached first, then standalone
    ///
    /// Entries come out in discovery order, not by `created_at`. A
    /// `StorageReference` is never empty, so no blank entries can appear.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<ReceiptView>, ReceiptError> {
        let loads = self
            .loads
            .find_loads(Filter::is_set(LoadField::ReceiptStorageId))
            .await
            .map_err(|e| ReceiptError::storage("list load receipts", &e))?;
        let standalone = self
            .ledger
            .find_receipts(Filter::All)
            .await
            .map_err(|e| ReceiptError::storage("list standalone receipts", &e))?;

        let mut views: Vec<ReceiptView> = loads.iter().filter_map(ReceiptView::from_load).collect();
        views.extend(standalone.into_iter().map(ReceiptView::from));
        debug!(count = views.len(), "listed receipts");
        Ok(views)
    }

    /// Records a receipt that has no load yet
    ///
    /// The blob is not checked for existence; the upload may still be in
    /// flight. A missing blob surfaces on the first download attempt.
    #[instrument(skip(self))]
    pub async fn save_standalone(&self, raw: &str) -> Result<StandaloneReceipt, ReceiptError> {
        let storage_reference = StorageReference::parse(raw)?;
        let receipt = self
            .ledger
            .insert_receipt(NewStandaloneReceipt {
                storage_reference,
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| ReceiptError::storage("insert standalone receipt", &e))?;
        debug!(receipt_id = %receipt.id, reference = %receipt.storage_reference, "standalone receipt saved");
        Ok(receipt)
    }

    pub async fn get_standalone(&self, id: ReceiptId) -> Result<StandaloneReceipt, ReceiptError> {
        self.ledger.get_receipt(id).await.map_err(|e| {
            if e.is_not_found() {
                ReceiptError::ReceiptNotFound(id.to_string())
            } else {
                ReceiptError::storage("get standalone receipt", &e)
            }
        })
    }
}
