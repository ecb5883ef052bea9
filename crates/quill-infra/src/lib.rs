//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All backends enabled
//! - `minimal` - In-memory backend only
//! - `postgres` - PostgreSQL backend via SeaORM

pub mod memory;

#[cfg(feature = "postgres")]
pub mod database;

pub use memory::{MemoryContentStore, MemoryStoreConfig};

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, PostgresContentStore};
