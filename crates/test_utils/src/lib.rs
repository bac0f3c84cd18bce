//! Test Utilities Crate
//!
//! Shared test infrastructure for the freight receipts test suite.
//!
//! # Modules
//!
//! - `fixtures`: fixed storage references and the raw forms clients send them in
//! - `builders`: builders for loads and request bodies
//! - `assertions`: assertion helpers for references and listings
//! - `generators`: proptest strategies and `fake`-backed random data

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
