//! Infrastructure Database Layer
//!
//! PostgreSQL record-store adapters built on SQLx.
//!
//! # Architecture
//!
//! - [`repositories`] hold the SQL for each table and return row types
//! - [`adapters`] implement the domain ports on top of the repositories
//! - [`filter_sql`] renders domain record filters as parameterised SQL
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresLoadStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/freight")).await?;
//! run_migrations(&pool).await?;
//! let loads = PostgresLoadStore::new(pool.clone());
//! ```

pub mod pool;
pub mod error;
pub mod filter_sql;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use adapters::{PostgresLoadStore, PostgresReceiptLedger};
