//! Read-side composition: posts stitched together with their relations and
//! a statistics snapshot built from the materialized counters.

use async_trait::async_trait;

use quill_core::domain::{EntityKey, PostStatistics, PostSummary};
use quill_core::error::{StoreError, StoreResult};
use quill_core::ports::ContentAggregateStore;
use quill_core::query::{Page, PostQuery};

use super::MemoryContentStore;

#[async_trait]
impl<K: EntityKey> ContentAggregateStore<K> for MemoryContentStore<K> {
    async fn get_summary_by_id(&self, post_id: &K) -> StoreResult<PostSummary<K>> {
        let (post, categories, tags, attachments) = {
            let state = self.state.read().await;
            let post = state
                .posts
                .get(post_id)
                .cloned()
                .ok_or(StoreError::not_found("post"))?;
            (
                post,
                state.categories_of(post_id),
                state.tags_of(post_id),
                state.attachments_of(post_id),
            )
        };
        let comment_count = self.comment_count(post_id).await;
        let statistics = PostStatistics::of(&post, comment_count);
        Ok(PostSummary {
            post,
            categories,
            tags,
            attachments,
            statistics,
        })
    }

    async fn query_summaries(&self, query: PostQuery<K>) -> StoreResult<Page<PostSummary<K>>> {
        let page = self.run_query(&query).await?;
        let state = self.state.read().await;
        let summaries = page
            .items
            .into_iter()
            .map(|(post, comment_count)| {
                let statistics = PostStatistics::of(&post, comment_count);
                PostSummary {
                    categories: state.categories_of(&post.id),
                    tags: state.tags_of(&post.id),
                    attachments: state.attachments_of(&post.id),
                    statistics,
                    post,
                }
            })
            .collect();
        Ok(Page::new(
            summaries,
            page.total_count,
            page.page_index,
            page.page_size,
        ))
    }
}

#[cfg(test)]
mod tests {
    use quill_core::domain::{Category, Post, PostStatus, PostType, Tag};
    use quill_core::ports::{
        PostCategoryStore, PostLikeStore, PostStore, PostTagStore, PostViewStore,
    };
    use quill_core::query::SortOrder;

    use super::*;

    async fn seeded() -> MemoryContentStore<u32> {
        let store = MemoryContentStore::new();
        store
            .create(Post::new(1u32, 7, "a post about rust", PostType::Article))
            .await
            .unwrap();
        store.update_status(&1, PostStatus::Published).await.unwrap();
        store.create_category(Category::new(10, "tech")).await.unwrap();
        store.create_tag(Tag::new(20, "rust")).await.unwrap();
        store.add_to_category(&1, &10).await.unwrap();
        store.add_tag(&1, &20).await.unwrap();
        store.like_post(&1, &100).await.unwrap();
        store.record_view(&1, &100).await.unwrap();
        store.record_view(&1, &101).await.unwrap();
        store
    }

    #[tokio::test]
    async fn summary_composes_relations_and_counters() {
        let store = seeded().await;
        let summary = store.get_summary_by_id(&1).await.unwrap();

        assert_eq!(summary.post.id, 1);
        assert_eq!(summary.categories.len(), 1);
        assert_eq!(summary.categories[0].name, "tech");
        assert_eq!(summary.tags[0].name, "rust");
        assert!(summary.attachments.is_empty());
        assert_eq!(summary.statistics.like_count, 1);
        assert_eq!(summary.statistics.view_count, 2);
        assert_eq!(summary.statistics.comment_count, 0);
        assert_eq!(summary.statistics.engagement_rate(), 0.5);
    }

    #[tokio::test]
    async fn summary_of_missing_post_is_not_found() {
        let store = MemoryContentStore::<u32>::new();
        assert!(matches!(
            store.get_summary_by_id(&42).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn query_summaries_preserves_engine_ordering() {
        let store = seeded().await;
        store
            .create(Post::new(2u32, 7, "another rust post", PostType::Article))
            .await
            .unwrap();
        store.update_status(&2, PostStatus::Published).await.unwrap();

        let page = store
            .query_summaries(PostQuery {
                sort: SortOrder::MostViewed,
                ..PostQuery::default()
            })
            .await
            .unwrap();
        let ids: Vec<u32> = page.items.iter().map(|s| s.post.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(page.items[0].categories.len(), 1);
    }

    #[tokio::test]
    async fn configure_callback_mutates_a_default_query() {
        let store = seeded().await;
        let page = store
            .query_summaries_with(|query| {
                query.page_size = 1;
                query.keyword = Some("rust".into());
            })
            .await
            .unwrap();
        assert_eq!(page.page_size, 1);
        assert_eq!(page.items.len(), 1);
    }
}
