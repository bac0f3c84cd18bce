//! Repository implementations
//!
//! Repositories own the SQL for one table each and speak in row types.
//! Mapping rows to domain records happens in the adapters.

pub mod loads;
pub mod receipts;

pub use loads::{LoadRepository, LoadRow};
pub use receipts::{ReceiptRepository, ReceiptRow};
