//! Receipt lifecycle coordination
//!
//! Three stores can hold a storage reference: the blob store, a load's
//! `receipt_storage_id`, and the standalone ledger. The coordinator keeps
//! them consistent on attach, delete and load removal.
//!
//! The record store is authoritative. Blob deletes are best effort: a
//! failure becomes a [`StorageWarning`] on the returned report and a
//! `blob_delete_failed` observer event, and the operation carries on. Any
//! record-store failure fails the operation.
//!
//! Operations on the same reference are not serialized. A concurrent
//! `attach` and `delete_by_reference` can leave a load pointing at a
//! deleted blob; callers needing more must serialize above this layer.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use core_kernel::{Filter, LoadId, PortError, ReceiptId, StorageReference};
use domain_loads::{Load, LoadField, LoadPatch, LoadStorePort};

use crate::error::{ReceiptError, StorageWarning};
use crate::observer::{LifecycleEvent, LifecycleObserver, TracingObserver};
use crate::ports::{BlobStorePort, ReceiptLedgerPort};
use crate::receipt::ReceiptField;

/// Outcome of [`ReceiptLifecycleCoordinator::delete_by_reference`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    pub reference: StorageReference,
    pub blob_deleted: bool,
    /// Loads whose `receipt_storage_id` was cleared
    pub loads_cleared: usize,
    /// Standalone ledger records removed
    pub receipts_removed: usize,
    pub warnings: Vec<StorageWarning>,
}

/// Outcome of [`ReceiptLifecycleCoordinator::cascade_delete_for_load`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub load_id: LoadId,
    pub blob_delete_attempted: bool,
    pub warnings: Vec<StorageWarning>,
}

/// Orchestrates attach, delete-by-reference and cascade delete
#[derive(Clone)]
pub struct ReceiptLifecycleCoordinator {
    loads: Arc<dyn LoadStorePort>,
    ledger: Arc<dyn ReceiptLedgerPort>,
    blobs: Arc<dyn BlobStorePort>,
    observer: Arc<dyn LifecycleObserver>,
}

impl ReceiptLifecycleCoordinator {
    /// Creates a coordinator reporting failures through [`TracingObserver`]
    pub fn new(
        loads: Arc<dyn LoadStorePort>,
        ledger: Arc<dyn ReceiptLedgerPort>,
        blobs: Arc<dyn BlobStorePort>,
    ) -> Self {
        Self {
            loads,
            ledger,
            blobs,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Binds a receipt to a load and returns the updated load
    ///
    /// The load is looked up before the reference is parsed, so an unknown
    /// load wins over a malformed reference. A previously attached blob is
    /// not deleted; its reference is logged and left for the caller.
    ///
    /// # Errors
    ///
    /// - `LoadNotFound` if the load does not exist
    /// - `InvalidReference` if `raw` cannot be normalized
    /// - `StorageOperationFailed` if the record store fails
    #[instrument(skip(self), fields(load_id = %load_id))]
    pub async fn attach(&self, load_id: LoadId, raw: &str) -> Result<Load, ReceiptError> {
        let current = self.get_load(load_id, "get load for attach").await?;
        let reference = StorageReference::parse(raw)?;

        if let Some(previous) = current.receipt_storage_id.as_ref().filter(|p| **p != reference) {
            info!(
                superseded = %previous,
                replacement = %reference,
                "receipt replaced; superseded blob is not deleted"
            );
        }

        let load = self
            .loads
            .patch_load(load_id, LoadPatch::set_receipt(reference))
            .await
            .map_err(|e| self.load_port_failed(load_id, "attach receipt", &e))?;
        debug!(reference = ?load.receipt_storage_id, "receipt attached");
        Ok(load)
    }

    /// Removes a reference from every place it appears
    ///
    /// Steps run in a fixed order and each runs regardless of the others:
    /// delete the blob, clear every load pointing at it, delete every
    /// standalone record holding it. A blob failure is reported as a
    /// warning. If any record-store step fails, the remaining record steps
    /// still run and the error names every failed step.
    #[instrument(skip(self))]
    pub async fn delete_by_reference(&self, raw: &str) -> Result<DeletionReport, ReceiptError> {
        let reference = StorageReference::parse(raw)?;
        let mut warnings = Vec::new();
        let mut failures: Vec<(&'static str, PortError)> = Vec::new();

        let blob_deleted = match self.blobs.delete(&reference).await {
            Ok(()) => true,
            Err(e) => {
                warnings.push(self.blob_delete_failed(&reference, "delete by reference", &e));
                false
            }
        };

        let loads_cleared = self.clear_load_references(&reference, &mut failures).await;
        let receipts_removed = self.remove_standalone(&reference, &mut failures).await;

        if !failures.is_empty() {
            for (operation, e) in &failures {
                self.notify_record_failure(*operation, e);
            }
            return Err(ReceiptError::StorageOperationFailed {
                operation: failures.iter().map(|(op, _)| *op).collect::<Vec<_>>().join(", "),
                message: failures
                    .iter()
                    .map(|(op, e)| format!("{}: {}", op, e))
                    .collect::<Vec<_>>()
                    .join("; "),
            });
        }

        debug!(%reference, blob_deleted, loads_cleared, receipts_removed, "reference deleted");
        Ok(DeletionReport {
            reference,
            blob_deleted,
            loads_cleared,
            receipts_removed,
            warnings,
        })
    }

    /// Deletes a load and, best effort, its attached blob
    ///
    /// At most one blob delete is attempted. The load record is deleted
    /// whether or not the blob delete succeeded.
    #[instrument(skip(self), fields(load_id = %load_id))]
    pub async fn cascade_delete_for_load(&self, load_id: LoadId) -> Result<CascadeReport, ReceiptError> {
        let load = self.get_load(load_id, "get load for delete").await?;
        let mut warnings = Vec::new();

        if let Some(reference) = load.receipt_storage_id.as_ref() {
            if let Err(e) = self.blobs.delete(reference).await {
                warnings.push(self.blob_delete_failed(reference, "cascade delete", &e));
            }
        }

        self.loads
            .delete_load(load_id)
            .await
            .map_err(|e| self.load_port_failed(load_id, "delete load", &e))?;

        debug!(warnings = warnings.len(), "load deleted");
        Ok(CascadeReport {
            load_id,
            blob_delete_attempted: load.has_receipt(),
            warnings,
        })
    }

    /// Deletes a standalone receipt by id, removing its reference everywhere
    pub async fn delete_standalone_receipt(&self, id: ReceiptId) -> Result<DeletionReport, ReceiptError> {
        let receipt = self.ledger.get_receipt(id).await.map_err(|e| {
            if e.is_not_found() {
                ReceiptError::ReceiptNotFound(id.to_string())
            } else {
                self.record_store_failed("get standalone receipt", &e)
            }
        })?;
        self.delete_by_reference(receipt.storage_reference.as_str()).await
    }

    async fn get_load(&self, id: LoadId, operation: &'static str) -> Result<Load, ReceiptError> {
        self.loads
            .get_load(id)
            .await
            .map_err(|e| self.load_port_failed(id, operation, &e))
    }

    async fn clear_load_references(
        &self,
        reference: &StorageReference,
        failures: &mut Vec<(&'static str, PortError)>,
    ) -> usize {
        let loads = match self
            .loads
            .find_loads(Filter::eq(LoadField::ReceiptStorageId, reference))
            .await
        {
            Ok(loads) => loads,
            Err(e) => {
                failures.push(("find loads by reference", e));
                return 0;
            }
        };

        let mut cleared = 0;
        for load in loads {
            match self.loads.patch_load(load.id, LoadPatch::clear_receipt()).await {
                Ok(_) => cleared += 1,
                // Deleted since the query; nothing left to clear
                Err(e) if e.is_not_found() => {}
                Err(e) => failures.push(("clear load reference", e)),
            }
        }
        cleared
    }

    async fn remove_standalone(
        &self,
        reference: &StorageReference,
        failures: &mut Vec<(&'static str, PortError)>,
    ) -> usize {
        let receipts = match self
            .ledger
            .find_receipts(Filter::eq(ReceiptField::StorageReference, reference))
            .await
        {
            Ok(receipts) => receipts,
            Err(e) => {
                failures.push(("find standalone receipts by reference", e));
                return 0;
            }
        };

        let mut removed = 0;
        for receipt in receipts {
            match self.ledger.delete_receipt(receipt.id).await {
                Ok(()) => removed += 1,
                Err(e) if e.is_not_found() => {}
                Err(e) => failures.push(("delete standalone receipt", e)),
            }
        }
        removed
    }

    fn blob_delete_failed(
        &self,
        reference: &StorageReference,
        operation: &'static str,
        error: &PortError,
    ) -> StorageWarning {
        self.observer.record(&LifecycleEvent::BlobDeleteFailed {
            reference: reference.clone(),
            operation,
            message: error.to_string(),
        });
        StorageWarning::blob_delete(reference, error)
    }

    /// NotFound on a load port means the load is gone; anything else is a
    /// record-store failure and is reported to the observer
    fn load_port_failed(&self, id: LoadId, operation: &'static str, error: &PortError) -> ReceiptError {
        if error.is_not_found() {
            ReceiptError::LoadNotFound(id)
        } else {
            self.record_store_failed(operation, error)
        }
    }

    fn record_store_failed(&self, operation: &'static str, error: &PortError) -> ReceiptError {
        self.notify_record_failure(operation, error);
        ReceiptError::storage(operation, error)
    }

    fn notify_record_failure(&self, operation: &'static str, error: &PortError) {
        self.observer.record(&LifecycleEvent::RecordStoreFailed {
            operation,
            message: error.to_string(),
        });
    }
}
