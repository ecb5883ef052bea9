//! Query engine over the in-memory state: conjunctive filters, ranked
//! ordering with the ascending-id tie-break, then pagination.

use std::collections::HashMap;

use quill_core::domain::{EntityKey, Post};
use quill_core::error::StoreResult;
use quill_core::query::rank::{self, RankKey};
use quill_core::query::{Page, PostQuery, SortOrder};

use super::{MemoryContentStore, State};

fn matches<K: EntityKey>(state: &State<K>, post: &Post<K>, query: &PostQuery<K>) -> bool {
    if post.status != query.status {
        return false;
    }
    if let Some(kind) = query.kind {
        if post.kind != kind {
            return false;
        }
    }
    if let Some(author) = &query.author_id {
        if &post.author_id != author {
            return false;
        }
    }
    if let Some(category) = &query.category_id {
        if !state
            .post_categories
            .contains(&(post.id.clone(), category.clone()))
        {
            return false;
        }
    }
    if let Some(tag) = &query.tag_id {
        if !state.post_tags.contains(&(post.id.clone(), tag.clone())) {
            return false;
        }
    }
    if let Some(keyword) = &query.keyword {
        let needle = keyword.to_lowercase();
        let in_title = post
            .title
            .as_deref()
            .is_some_and(|title| title.to_lowercase().contains(&needle));
        let in_content = post.content.to_lowercase().contains(&needle);
        if !in_title && !in_content {
            return false;
        }
    }
    true
}

impl<K: EntityKey> MemoryContentStore<K> {
    /// Run a query, returning each page item with its comment count so the
    /// composer can snapshot statistics without a second lookup.
    pub(crate) async fn run_query(
        &self,
        query: &PostQuery<K>,
    ) -> StoreResult<Page<(Post<K>, u64)>> {
        query.validate()?;

        let filtered: Vec<Post<K>> = {
            let state = self.state.read().await;
            state
                .posts
                .values()
                .filter(|post| matches(&state, post, query))
                .cloned()
                .collect()
        };

        // Comment counts come from the external subsystem and only matter
        // for ranking when the order depends on them.
        let ranks_on_comments = matches!(
            query.sort,
            SortOrder::MostPopular | SortOrder::MostCommented
        );
        let mut counts: HashMap<K, u64> = HashMap::new();
        if ranks_on_comments && self.comments.is_some() {
            for post in &filtered {
                let count = self.comment_count(&post.id).await;
                counts.insert(post.id.clone(), count);
            }
        }

        let mut keyed: Vec<(RankKey, Post<K>)> = filtered
            .into_iter()
            .map(|post| {
                let comment_count = counts.get(&post.id).copied().unwrap_or(0);
                (RankKey::of(query.sort, &post, comment_count), post)
            })
            .collect();
        keyed.sort_by(|a, b| {
            rank::compare(&(a.0, &a.1.id), &(b.0, &b.1.id), query.descending)
        });

        let page = Page::paginate(keyed, query.page_index, query.page_size);
        let mut items = Vec::with_capacity(page.items.len());
        for (_, post) in page.items {
            let comment_count = match counts.get(&post.id) {
                Some(count) => *count,
                None => self.comment_count(&post.id).await,
            };
            items.push((post, comment_count));
        }
        Ok(Page::new(
            items,
            page.total_count,
            page.page_index,
            page.page_size,
        ))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Arc;

    use quill_core::domain::{Category, PostStatus, PostType};
    use quill_core::ports::{
        CommentCountSource, PostCategoryStore, PostStore, PostViewStore,
    };

    use super::*;

    struct FixedComments(HashMap<u32, u64>);

    #[async_trait]
    impl CommentCountSource<u32> for FixedComments {
        async fn comment_count(&self, post_id: &u32) -> u64 {
            self.0.get(post_id).copied().unwrap_or(0)
        }
    }

    async fn published(store: &MemoryContentStore<u32>, id: u32, author: u32, content: &str) {
        store
            .create(Post::new(id, author, content, PostType::Article))
            .await
            .unwrap();
        store.update_status(&id, PostStatus::Published).await.unwrap();
    }

    fn query() -> PostQuery<u32> {
        PostQuery::default()
    }

    #[tokio::test]
    async fn popularity_blends_counters_across_posts() {
        // A: like=10 favorite=3 comment=2 view=50 -> 30.0
        // B: like=3 favorite=1 comment=1 view=200 -> 28.0
        let comments = FixedComments(HashMap::from([(1, 2), (2, 1)]));
        let store = MemoryContentStore::new().with_comment_source(Arc::new(comments));
        published(&store, 1, 7, "post a").await;
        published(&store, 2, 7, "post b").await;
        {
            let mut state = store.state.write().await;
            let a = state.posts.get_mut(&1).unwrap();
            (a.like_count, a.favorite_count, a.view_count) = (10, 3, 50);
            let b = state.posts.get_mut(&2).unwrap();
            (b.like_count, b.favorite_count, b.view_count) = (3, 1, 200);
        }

        let page = store
            .run_query(&PostQuery {
                sort: SortOrder::MostPopular,
                ..query()
            })
            .await
            .unwrap();
        let ids: Vec<u32> = page.items.iter().map(|(post, _)| post.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn ranked_ordering_is_stable_across_reruns() {
        let store = MemoryContentStore::new();
        for id in [3, 1, 2] {
            published(&store, id, 7, "same score").await;
        }

        let q = PostQuery {
            sort: SortOrder::MostPopular,
            ..query()
        };
        let first: Vec<u32> = store
            .run_query(&q)
            .await
            .unwrap()
            .items
            .iter()
            .map(|(p, _)| p.id)
            .collect();
        let second: Vec<u32> = store
            .run_query(&q)
            .await
            .unwrap()
            .items
            .iter()
            .map(|(p, _)| p.id)
            .collect();
        // All scores tie at zero; the ascending-id tie-break decides.
        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn filters_are_conjunctive() {
        let store = MemoryContentStore::new();
        published(&store, 1, 7, "rust and databases").await;
        published(&store, 2, 7, "rust and gardening").await;
        published(&store, 3, 8, "rust and databases").await;
        store.create_category(Category::new(40, "tech")).await.unwrap();
        store.add_to_category(&1, &40).await.unwrap();
        store.add_to_category(&3, &40).await.unwrap();

        let page = store
            .run_query(&PostQuery {
                keyword: Some("DATABASES".into()),
                category_id: Some(40),
                author_id: Some(7),
                ..query()
            })
            .await
            .unwrap();
        let ids: Vec<u32> = page.items.iter().map(|(post, _)| post.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn keyword_matches_title_case_insensitively() {
        let store = MemoryContentStore::new();
        store
            .create(
                Post::new(1u32, 7, "body text", PostType::Article)
                    .with_title("Async Patterns"),
            )
            .await
            .unwrap();
        store.update_status(&1, PostStatus::Published).await.unwrap();

        let page = store
            .run_query(&PostQuery {
                keyword: Some("async".into()),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_the_default_query() {
        let store = MemoryContentStore::new();
        store
            .create(Post::new(1u32, 7, "draft body", PostType::Article))
            .await
            .unwrap();
        published(&store, 2, 7, "published body").await;

        let page = store.run_query(&query()).await.unwrap();
        let ids: Vec<u32> = page.items.iter().map(|(post, _)| post.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn most_viewed_ranks_by_view_counter() {
        let store = MemoryContentStore::new();
        published(&store, 1, 7, "a").await;
        published(&store, 2, 7, "b").await;
        store.record_view(&2, &100).await.unwrap();
        store.record_view(&2, &101).await.unwrap();
        store.record_view(&1, &100).await.unwrap();

        let page = store
            .run_query(&PostQuery {
                sort: SortOrder::MostViewed,
                ..query()
            })
            .await
            .unwrap();
        let ids: Vec<u32> = page.items.iter().map(|(post, _)| post.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn pagination_metadata_is_exact() {
        let store = MemoryContentStore::new();
        for id in 1..=7u32 {
            published(&store, id, 7, "body").await;
        }

        let page = store
            .run_query(&PostQuery {
                page_index: 2,
                page_size: 3,
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_count, 7);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_previous_page());
        assert!(page.has_next_page());

        let past_the_end = store
            .run_query(&PostQuery {
                page_index: 4,
                page_size: 3,
                ..query()
            })
            .await
            .unwrap();
        assert!(past_the_end.items.is_empty());
        assert!(!past_the_end.has_next_page());
    }
}
