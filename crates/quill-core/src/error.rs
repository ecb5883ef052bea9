//! Store-level error taxonomy.

use thiserror::Error;

/// Failures surfaced by a content store.
///
/// Idempotent no-ops (adding an edge that exists, liking a post twice,
/// removing an absent edge) are silent successes, not errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{entity} already exists")]
    Conflict { entity: &'static str },

    #[error("stale concurrency token on update")]
    ConcurrencyConflict,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn conflict(entity: &'static str) -> Self {
        Self::Conflict { entity }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
