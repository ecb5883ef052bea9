//! The interaction ledger: per-(post, user) events that keep the post's
//! materialized counters in sync.
//!
//! Edge and counter mutation commit as one unit at the store boundary, so a
//! counter can never be observed out of sync with its edge set, and a
//! decrement only happens when a row was actually removed.

use async_trait::async_trait;

use crate::domain::EntityKey;
use crate::error::StoreResult;
use crate::query::{Page, UserPostsQuery};

#[async_trait]
pub trait PostLikeStore<K: EntityKey>: Send + Sync {
    /// "Ensure liked": a second like by the same user changes nothing.
    async fn like_post(&self, post_id: &K, user_id: &K) -> StoreResult<()>;

    /// No-op if the user never liked the post.
    async fn unlike_post(&self, post_id: &K, user_id: &K) -> StoreResult<()>;
}

#[async_trait]
pub trait PostFavoriteStore<K: EntityKey>: Send + Sync {
    async fn favorite_post(&self, post_id: &K, user_id: &K) -> StoreResult<()>;

    async fn unfavorite_post(&self, post_id: &K, user_id: &K) -> StoreResult<()>;
}

/// Shares are idempotent per user and not revocable.
#[async_trait]
pub trait PostShareStore<K: EntityKey>: Send + Sync {
    async fn record_share(&self, post_id: &K, user_id: &K) -> StoreResult<()>;
}

#[async_trait]
pub trait PostViewStore<K: EntityKey>: Send + Sync {
    /// Every call records an event and increments the counter, unless the
    /// backend is configured to dedupe per user inside a time window.
    async fn record_view(&self, post_id: &K, user_id: &K) -> StoreResult<()>;

    /// Distinct posts the user viewed, most recent view first.
    async fn viewed_post_ids(&self, query: UserPostsQuery<K>) -> StoreResult<Page<K>>;
}

/// Comment counts live in an external subsystem; this is the read hook the
/// ranking and statistics paths use. Without a source, counts are 0.
#[async_trait]
pub trait CommentCountSource<K: EntityKey>: Send + Sync {
    async fn comment_count(&self, post_id: &K) -> u64;
}
