use async_trait::async_trait;

use crate::domain::{EntityKey, Post, PostStatus, PostType};
use crate::error::StoreResult;

/// CRUD and partial updates for posts.
///
/// Partial updates bump `updated_at`. Counters are never written through
/// this port; the interaction ledger owns them, and `update` implementations
/// must preserve the stored counter values on full replace.
#[async_trait]
pub trait PostStore<K: EntityKey>: Send + Sync {
    /// Fails with `Conflict` if the id already exists.
    async fn create(&self, post: Post<K>) -> StoreResult<()>;

    /// Full replace. `NotFound` if absent; `ConcurrencyConflict` if the
    /// supplied version token is stale.
    async fn update(&self, post: Post<K>) -> StoreResult<()>;

    async fn update_title(&self, id: &K, title: &str) -> StoreResult<()>;

    async fn update_content(&self, id: &K, content: &str) -> StoreResult<()>;

    async fn update_type(&self, id: &K, kind: PostType) -> StoreResult<()>;

    /// Transitioning into `Published` sets `published_at` to now, including
    /// on republish; transitioning away never clears it. Setting the current
    /// status again is a silent no-op.
    async fn update_status(&self, id: &K, status: PostStatus) -> StoreResult<()>;

    /// Physical removal, cascading edges and interaction records.
    async fn delete(&self, id: &K) -> StoreResult<()>;

    /// Atomic batch removal: if any id is absent, nothing is deleted and
    /// the call fails with `NotFound`.
    async fn delete_many(&self, ids: &[K]) -> StoreResult<()>;

    /// Never errors on a missing row.
    async fn find_by_id(&self, id: &K) -> StoreResult<Option<Post<K>>>;
}
