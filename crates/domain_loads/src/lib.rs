//! Load Management Domain
//!
//! A load is a freight record: where it is, where it is going, how heavy it
//! is, what truck it needs, and who to call. A load may carry one receipt
//! reference pointing at a blob in the object store; that field is owned by
//! the receipt lifecycle, never by plain load updates.
//!
//! # Examples
//!
//! ```rust
//! use domain_loads::{LoadFields, WeightUnit, LengthUnit};
//! use rust_decimal::Decimal;
//!
//! let fields = LoadFields {
//!     current_location: "Nagpur".to_string(),
//!     destination_location: "Pune".to_string(),
//!     weight: Decimal::new(125, 1),
//!     weight_unit: WeightUnit::Ton,
//!     truck_length: Decimal::new(32, 0),
//!     length_unit: LengthUnit::Ft,
//!     contact_number: "+91 98200 12345".to_string(),
//!     staff_contact_number: "022-2656-0000".to_string(),
//! };
//! assert!(fields.check().is_ok());
//! ```

pub mod load;
pub mod error;
pub mod ports;
pub mod services;

pub use load::{
    Load, LoadFields, LoadField, LoadPatch, NewLoad, WeightUnit, LengthUnit,
};
pub use error::LoadError;
pub use ports::LoadStorePort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockLoadStore;
pub use services::{LoadService, LoadListQuery};
