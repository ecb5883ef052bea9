//! # Quill Core
//!
//! The domain layer of the Quill content-publishing data stack.
//! This crate contains entities, query/ranking math, and the capability
//! traits a storage backend implements. It has zero infrastructure
//! dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;

pub use error::{StoreError, StoreResult};
