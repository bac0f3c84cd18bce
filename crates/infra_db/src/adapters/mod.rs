//! Domain Adapters
//!
//! Each adapter implements a domain port on top of its repository,
//! translating rows to domain records and `DatabaseError` to `PortError`.
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresLoadStore;
//! use domain_loads::LoadStorePort;
//!
//! let store: Arc<dyn LoadStorePort> = Arc::new(PostgresLoadStore::new(pool));
//! let load = store.get_load(load_id).await?;
//! ```

pub mod loads;
pub mod receipts;

pub use loads::PostgresLoadStore;
pub use receipts::PostgresReceiptLedger;
