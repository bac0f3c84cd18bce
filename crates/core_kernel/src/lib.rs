//! Core Kernel - Foundational types shared by the freight receipts crates
//!
//! This crate provides the building blocks used across all domain modules:
//! - Strongly-typed identifiers for loads and standalone receipts
//! - Canonical blob references and the parser that produces them
//! - The port error taxonomy and marker traits for hexagonal adapters
//! - Record filters (`eq`, `neq`, `gte`, `lte`, `and`, `or`) over named fields
//! - Business timezone helpers for calendar-day queries

pub mod identifiers;
pub mod storage_reference;
pub mod ports;
pub mod query;
pub mod temporal;
pub mod error;

pub use identifiers::{LoadId, ReceiptId};
pub use storage_reference::{is_canonical, StorageReference, InvalidReference};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
};
pub use query::{Filter, FieldValue, Filterable};
pub use temporal::Timezone;
pub use error::CoreError;
