//! Receipt Domain
//!
//! Receipts are images or documents stored as blobs in an external object
//! store. A receipt is either attached to a load (the load's
//! `receipt_storage_id` points at the blob) or standalone (a ledger record
//! created when the receipt was uploaded before any load existed).
//!
//! This crate keeps three things consistent as receipts come and go: the
//! blob, the load that points at it, and the standalone ledger.
//!
//! # Components
//!
//! - [`UploadService`]: mints upload targets and resolves download URLs
//! - [`ReceiptRegistry`]: the merged view of load-attached and standalone receipts
//! - [`ReceiptLifecycleCoordinator`]: attach, delete-by-reference, and cascade delete
//! - [`LifecycleObserver`]: hook invoked at failure points
//!
//! # Consistency policy
//!
//! The record store is authoritative. Blob-store failures during deletes are
//! downgraded to [`StorageWarning`]s and reported back; record-store failures
//! always fail the operation.
//!
//! ```rust,ignore
//! let coordinator = ReceiptLifecycleCoordinator::new(loads, ledger, blobs)
//!     .with_observer(Arc::new(TracingObserver));
//!
//! let load = coordinator.attach(load_id, "https://store/api/upload?token=...").await?;
//! let report = coordinator.delete_by_reference(load.receipt_storage_id.unwrap().as_str()).await?;
//! ```

pub mod receipt;
pub mod error;
pub mod ports;
pub mod observer;
pub mod registry;
pub mod lifecycle;
pub mod uploads;
pub mod adapters;

pub use receipt::{
    StandaloneReceipt, NewStandaloneReceipt, ReceiptKind, ReceiptView, ReceiptField,
};
pub use error::{ReceiptError, StorageWarning};
pub use ports::{BlobStorePort, ReceiptLedgerPort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockBlobStore, MockReceiptLedger, UploadUrlShape};
pub use observer::{LifecycleEvent, LifecycleObserver, TracingObserver};
#[cfg(any(test, feature = "mock"))]
pub use observer::RecordingObserver;
pub use registry::ReceiptRegistry;
pub use lifecycle::{ReceiptLifecycleCoordinator, DeletionReport, CascadeReport};
pub use uploads::{UploadService, UploadTarget};
pub use adapters::{HttpBlobStore, HttpBlobStoreConfig};
