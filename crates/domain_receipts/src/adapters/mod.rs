//! Blob store adapters
//!
//! The in-memory adapter used by tests lives in `ports::mock`.

pub mod http_blob_store;

pub use http_blob_store::{HttpBlobStore, HttpBlobStoreConfig};
