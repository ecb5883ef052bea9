use async_trait::async_trait;

use crate::domain::{EntityKey, PostSummary};
use crate::error::StoreResult;
use crate::query::{Page, PostQuery};

/// Read-side composition: posts stitched together with their relations and
/// a statistics snapshot. Owns no state and never re-derives counters.
#[async_trait]
pub trait ContentAggregateStore<K: EntityKey>: Send + Sync {
    /// `NotFound` if the post does not exist.
    async fn get_summary_by_id(&self, post_id: &K) -> StoreResult<PostSummary<K>>;

    /// Filter, rank, paginate, then compose each hit, preserving the
    /// engine's ordering.
    async fn query_summaries(&self, query: PostQuery<K>) -> StoreResult<Page<PostSummary<K>>>;

    /// Convenience entry point: mutate a default query before execution.
    async fn query_summaries_with<F>(&self, configure: F) -> StoreResult<Page<PostSummary<K>>>
    where
        F: FnOnce(&mut PostQuery<K>) + Send,
        Self: Sized,
    {
        let mut query = PostQuery::default();
        configure(&mut query);
        self.query_summaries(query).await
    }
}
