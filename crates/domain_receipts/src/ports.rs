//! Receipt Domain Ports
//!
//! Two external collaborators are reached from this crate:
//!
//! - [`BlobStorePort`]: the binary-object store holding receipt images
//! - [`ReceiptLedgerPort`]: the record-store table of standalone receipts
//!
//! Loads are reached through `domain_loads::LoadStorePort`. Timeouts and
//! retries belong to the adapters; nothing in the domain retries.

use async_trait::async_trait;

use core_kernel::{DomainPort, Filter, HealthCheckable, PortError, ReceiptId, StorageReference};

use crate::receipt::{NewStandaloneReceipt, ReceiptField, StandaloneReceipt};

/// Binary-object store operations
#[async_trait]
pub trait BlobStorePort: DomainPort + HealthCheckable {
    /// Mints a URL the client can upload bytes to
    ///
    /// The returned URL embeds the reference of the blob it will create,
    /// either as a `token` parameter or as the last path segment.
    async fn generate_upload_url(&self) -> Result<String, PortError>;

    /// Resolves a reference to a retrievable URL; `None` if no such blob
    async fn get_url(&self, reference: &StorageReference) -> Result<Option<String>, PortError>;

    /// Deletes the blob
    async fn delete(&self, reference: &StorageReference) -> Result<(), PortError>;
}

/// Record-store operations on the standalone receipts table
#[async_trait]
pub trait ReceiptLedgerPort: DomainPort + HealthCheckable {
    async fn insert_receipt(&self, receipt: NewStandaloneReceipt) -> Result<StandaloneReceipt, PortError>;

    /// Retrieves a receipt by ID, or `PortError::NotFound`
    async fn get_receipt(&self, id: ReceiptId) -> Result<StandaloneReceipt, PortError>;

    /// Returns every receipt matching `filter`, oldest first
    async fn find_receipts(&self, filter: Filter<ReceiptField>) -> Result<Vec<StandaloneReceipt>, PortError>;

    async fn delete_receipt(&self, id: ReceiptId) -> Result<(), PortError>;
}

/// In-memory implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use uuid::Uuid;

    use core_kernel::HealthCheckResult;

    const MOCK_HOST: &str = "https://blobs.mock";

    /// How [`MockBlobStore`] shapes the upload URLs it mints
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum UploadUrlShape {
        /// `.../upload?token=<ref>&exp=...`
        #[default]
        QueryToken,
        /// `.../upload/<compact hex ref>?sig=...`
        PathSegment,
        /// A URL with no reference in it
        Opaque,
    }

    /// In-memory blob store
    ///
    /// Minting an upload URL reserves the blob, standing in for the client
    /// upload that would follow. Every delete call is recorded, including
    /// ones made while `fail_deletes` is set.
    #[derive(Debug, Default, Clone)]
    pub struct MockBlobStore {
        blobs: Arc<RwLock<HashSet<StorageReference>>>,
        delete_attempts: Arc<RwLock<Vec<StorageReference>>>,
        shape: Arc<RwLock<UploadUrlShape>>,
        fail_deletes: Arc<AtomicBool>,
        unavailable: Arc<AtomicBool>,
    }

    impl MockBlobStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_shape(shape: UploadUrlShape) -> Self {
            let store = Self::new();
            *store.shape.write().await = shape;
            store
        }

        /// Stores a blob under `reference`, as a finished client upload would
        pub async fn put(&self, reference: StorageReference) {
            self.blobs.write().await.insert(reference);
        }

        pub async fn contains(&self, reference: &StorageReference) -> bool {
            self.blobs.read().await.contains(reference)
        }

        /// Every reference passed to `delete`, in call order
        pub async fn delete_attempts(&self) -> Vec<StorageReference> {
            self.delete_attempts.read().await.clone()
        }

        /// Makes `delete` fail with a connection error
        pub fn set_fail_deletes(&self, fail: bool) {
            self.fail_deletes.store(fail, Ordering::SeqCst);
        }

        /// Makes every call fail with a service-unavailable error
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        fn check_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::ServiceUnavailable {
                    service: "mock blob store".to_string(),
                });
            }
            Ok(())
        }
    }

    impl DomainPort for MockBlobStore {}

    #[async_trait]
    impl HealthCheckable for MockBlobStore {
        async fn health_check(&self) -> HealthCheckResult {
            match self.check_available() {
                Ok(()) => HealthCheckResult::healthy("mock-blob-store", 0),
                Err(e) => HealthCheckResult::unhealthy("mock-blob-store", 0, e.to_string()),
            }
        }
    }

    #[async_trait]
    impl BlobStorePort for MockBlobStore {
        async fn generate_upload_url(&self) -> Result<String, PortError> {
            self.check_available()?;
            let id = Uuid::new_v4();
            let url = match *self.shape.read().await {
                UploadUrlShape::QueryToken => {
                    format!("{}/api/upload?token={}&exp=3600", MOCK_HOST, id.hyphenated())
                }
                UploadUrlShape::PathSegment => {
                    format!("{}/api/upload/{}?sig=mock", MOCK_HOST, id.simple())
                }
                UploadUrlShape::Opaque => return Ok(format!("{}/api/upload?sig=mock", MOCK_HOST)),
            };
            let reference = StorageReference::parse(&id.hyphenated().to_string())
                .map_err(|e| PortError::internal(e.to_string()))?;
            self.blobs.write().await.insert(reference);
            Ok(url)
        }

        async fn get_url(&self, reference: &StorageReference) -> Result<Option<String>, PortError> {
            self.check_available()?;
            Ok(self
                .blobs
                .read()
                .await
                .contains(reference)
                .then(|| format!("{}/files/{}", MOCK_HOST, reference)))
        }

        async fn delete(&self, reference: &StorageReference) -> Result<(), PortError> {
            self.delete_attempts.write().await.push(reference.clone());
            self.check_available()?;
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(PortError::connection("mock blob delete failed"));
            }
            self.blobs.write().await.remove(reference);
            Ok(())
        }
    }

    /// In-memory standalone receipt ledger
    #[derive(Debug, Default, Clone)]
    pub struct MockReceiptLedger {
        receipts: Arc<RwLock<BTreeMap<ReceiptId, StandaloneReceipt>>>,
        unavailable: Arc<AtomicBool>,
    }

    impl MockReceiptLedger {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_receipts(receipts: Vec<StandaloneReceipt>) -> Self {
            let ledger = Self::new();
            for receipt in receipts {
                ledger.receipts.write().await.insert(receipt.id, receipt);
            }
            ledger
        }

        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        pub async fn len(&self) -> usize {
            self.receipts.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.receipts.read().await.is_empty()
        }

        fn check_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::connection("mock receipt ledger unavailable"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockReceiptLedger {}

    #[async_trait]
    impl HealthCheckable for MockReceiptLedger {
        async fn health_check(&self) -> HealthCheckResult {
            match self.check_available() {
                Ok(()) => HealthCheckResult::healthy("mock-receipt-ledger", 0),
                Err(e) => HealthCheckResult::unhealthy("mock-receipt-ledger", 0, e.to_string()),
            }
        }
    }

    #[async_trait]
    impl ReceiptLedgerPort for MockReceiptLedger {
        async fn insert_receipt(&self, receipt: NewStandaloneReceipt) -> Result<StandaloneReceipt, PortError> {
            self.check_available()?;
            let receipt = StandaloneReceipt {
                id: ReceiptId::new(),
                storage_reference: receipt.storage_reference,
                created_at: receipt.created_at,
            };
            self.receipts.write().await.insert(receipt.id, receipt.clone());
            Ok(receipt)
        }

        async fn get_receipt(&self, id: ReceiptId) -> Result<StandaloneReceipt, PortError> {
            self.check_available()?;
            self.receipts
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Receipt", id))
        }

        async fn find_receipts(&self, filter: Filter<ReceiptField>) -> Result<Vec<StandaloneReceipt>, PortError> {
            self.check_available()?;
            let receipts = self.receipts.read().await;
            let mut found: Vec<_> = receipts.values().filter(|r| filter.matches(*r)).cloned().collect();
            found.sort_by_key(|r| r.created_at);
            Ok(found)
        }

        async fn delete_receipt(&self, id: ReceiptId) -> Result<(), PortError> {
            self.check_available()?;
            self.receipts
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Receipt", id))
        }
    }
}
