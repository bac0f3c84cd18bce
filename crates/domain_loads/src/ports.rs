//! Load Domain Ports
//!
//! `LoadStorePort` is the record-store table for loads. The PostgreSQL
//! adapter lives in `infra_db`; the in-memory [`mock::MockLoadStore`] backs
//! unit tests and the API test server.
//!
//! ```rust,ignore
//! use domain_loads::{LoadStorePort, LoadField};
//! use core_kernel::Filter;
//!
//! let with_receipts = store.find_loads(Filter::is_set(LoadField::ReceiptStorageId)).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, Filter, HealthCheckable, LoadId, PortError};

use crate::load::{Load, LoadField, LoadPatch, NewLoad};

/// Record-store operations on the loads table
///
/// Each call is atomic on the store side; callers add no locking.
#[async_trait]
pub trait LoadStorePort: DomainPort + HealthCheckable {
    /// Inserts a load and returns it with its assigned id
    async fn insert_load(&self, load: NewLoad) -> Result<Load, PortError>;

    /// Retrieves a load by ID
    ///
    /// # Returns
    ///
    /// The load if found, or `PortError::NotFound`
    async fn get_load(&self, id: LoadId) -> Result<Load, PortError>;

    /// Applies a partial update and returns the updated load
    async fn patch_load(&self, id: LoadId, patch: LoadPatch) -> Result<Load, PortError>;

    /// Deletes a load; `PortError::NotFound` if it does not exist
    async fn delete_load(&self, id: LoadId) -> Result<(), PortError>;

    /// Returns every load matching `filter`, oldest first
    async fn find_loads(&self, filter: Filter<LoadField>) -> Result<Vec<Load>, PortError>;
}

/// In-memory implementation of LoadStorePort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    /// In-memory load table
    ///
    /// Ids are v7 UUIDs, so the `BTreeMap` iterates in insertion order.
    /// `set_unavailable(true)` makes every call fail with a connection
    /// error, for exercising record-store failure paths.
    #[derive(Debug, Default, Clone)]
    pub struct MockLoadStore {
        loads: Arc<RwLock<BTreeMap<LoadId, Load>>>,
        unavailable: Arc<AtomicBool>,
    }

    impl MockLoadStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with loads for testing
        pub async fn with_loads(loads: Vec<Load>) -> Self {
            let store = Self::new();
            for load in loads {
                store.loads.write().await.insert(load.id, load);
            }
            store
        }

        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Number of stored loads
        pub async fn len(&self) -> usize {
            self.loads.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.loads.read().await.is_empty()
        }

        /// Direct lookup that bypasses the availability switch
        pub async fn snapshot(&self, id: LoadId) -> Option<Load> {
            self.loads.read().await.get(&id).cloned()
        }

        fn check_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::connection("mock load store unavailable"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockLoadStore {}

    #[async_trait]
    impl HealthCheckable for MockLoadStore {
        async fn health_check(&self) -> HealthCheckResult {
            match self.check_available() {
                Ok(()) => HealthCheckResult::healthy("mock-load-store", 0),
                Err(e) => HealthCheckResult::unhealthy("mock-load-store", 0, e.to_string()),
            }
        }
    }

    #[async_trait]
    impl LoadStorePort for MockLoadStore {
        async fn insert_load(&self, load: NewLoad) -> Result<Load, PortError> {
            self.check_available()?;
            let load = Load {
                id: LoadId::new(),
                fields: load.fields,
                created_at: load.created_at,
                receipt_storage_id: None,
            };
            self.loads.write().await.insert(load.id, load.clone());
            Ok(load)
        }

        async fn get_load(&self, id: LoadId) -> Result<Load, PortError> {
            self.check_available()?;
            self.loads
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Load", id))
        }

        async fn patch_load(&self, id: LoadId, patch: LoadPatch) -> Result<Load, PortError> {
            self.check_available()?;
            let mut loads = self.loads.write().await;
            let load = loads.get_mut(&id)
                .ok_or_else(|| PortError::not_found("Load", id))?;
            load.apply(patch);
            Ok(load.clone())
        }

        async fn delete_load(&self, id: LoadId) -> Result<(), PortError> {
            self.check_available()?;
            self.loads
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Load", id))
        }

        async fn find_loads(&self, filter: Filter<LoadField>) -> Result<Vec<Load>, PortError> {
            self.check_available()?;
            let loads = self.loads.read().await;
            let mut found: Vec<Load> = loads.values().filter(|l| filter.matches(*l)).cloned().collect();
            found.sort_by_key(|l| l.created_at);
            Ok(found)
        }
    }
}
