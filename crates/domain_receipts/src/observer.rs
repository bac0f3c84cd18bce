//! Lifecycle failure hook
//!
//! The coordinator and upload service call a [`LifecycleObserver`] at their
//! defined failure points, and only there. Successful calls produce ordinary
//! `tracing` spans, not observer events.

use core_kernel::StorageReference;
use tracing::{error, warn};

/// A failure point reached by a receipt operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Blob deletion failed and was downgraded to a warning
    BlobDeleteFailed {
        reference: StorageReference,
        operation: &'static str,
        message: String,
    },
    /// A record-store step failed; the enclosing operation fails
    RecordStoreFailed {
        operation: &'static str,
        message: String,
    },
    /// The blob store returned no usable upload URL
    UploadIssuanceFailed { message: String },
    /// A download URL could not be produced for a well-formed reference
    DownloadResolutionFailed {
        reference: StorageReference,
        message: String,
    },
}

impl LifecycleEvent {
    /// Stable event name used as the `event` field in logs
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::BlobDeleteFailed { .. } => "blob_delete_failed",
            LifecycleEvent::RecordStoreFailed { .. } => "record_store_failed",
            LifecycleEvent::UploadIssuanceFailed { .. } => "upload_issuance_failed",
            LifecycleEvent::DownloadResolutionFailed { .. } => "download_resolution_failed",
        }
    }
}

/// Receives lifecycle failure events
pub trait LifecycleObserver: Send + Sync + 'static {
    fn record(&self, event: &LifecycleEvent);
}

/// Default observer writing structured `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LifecycleObserver for TracingObserver {
    fn record(&self, event: &LifecycleEvent) {
        let name = event.name();
        match event {
            LifecycleEvent::BlobDeleteFailed { reference, operation, message } => {
                warn!(event = name, %reference, operation, %message, "blob delete failed, continuing");
            }
            LifecycleEvent::RecordStoreFailed { operation, message } => {
                error!(event = name, operation, %message, "record store operation failed");
            }
            LifecycleEvent::UploadIssuanceFailed { message } => {
                error!(event = name, %message, "could not issue upload target");
            }
            LifecycleEvent::DownloadResolutionFailed { reference, message } => {
                warn!(event = name, %reference, %message, "could not resolve download url");
            }
        }
    }
}

#[cfg(any(test, feature = "mock"))]
mod recording {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Observer that keeps every event for later assertions
    #[derive(Debug, Default, Clone)]
    pub struct RecordingObserver {
        events: Arc<Mutex<Vec<LifecycleEvent>>>,
    }

    impl RecordingObserver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<LifecycleEvent> {
            self.events.lock().map(|e| e.clone()).unwrap_or_default()
        }

        /// Names of the recorded events, in order
        pub fn names(&self) -> Vec<&'static str> {
            self.events().iter().map(LifecycleEvent::name).collect()
        }
    }

    impl LifecycleObserver for RecordingObserver {
        fn record(&self, event: &LifecycleEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event.clone());
            }
        }
    }
}

#[cfg(any(test, feature = "mock"))]
pub use recording::RecordingObserver;
