//! In-memory content store.
//!
//! Reference implementation of every port, also used as the test double.
//! One `RwLock` guards the whole state; a single write-guard critical
//! section per operation is what makes edge + counter mutation atomic and
//! interactions linearizable per (post, user, kind). Data is lost on
//! process restart.

mod aggregate;
mod interactions;
mod posts;
mod query;
mod relations;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use quill_core::domain::{
    Attachment, Category, EntityKey, InteractionRecord, Post, Tag,
};
use quill_core::error::{StoreError, StoreResult};
use quill_core::ports::CommentCountSource;

/// Tuning knobs for the in-memory backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreConfig {
    /// When set, repeat views by the same user inside the window are
    /// dropped. The default (`None`) counts every call.
    pub view_dedup_window: Option<Duration>,
}

pub(crate) struct State<K: EntityKey> {
    pub(crate) posts: HashMap<K, Post<K>>,
    pub(crate) categories: HashMap<K, Category<K>>,
    pub(crate) tags: HashMap<K, Tag<K>>,
    pub(crate) attachments: HashMap<K, Attachment<K>>,
    pub(crate) post_categories: BTreeSet<(K, K)>,
    pub(crate) post_tags: BTreeSet<(K, K)>,
    pub(crate) post_attachments: BTreeSet<(K, K)>,
    pub(crate) likes: HashMap<(K, K), DateTime<Utc>>,
    pub(crate) favorites: HashMap<(K, K), DateTime<Utc>>,
    pub(crate) shares: HashMap<(K, K), DateTime<Utc>>,
    /// Append-only view event log.
    pub(crate) views: Vec<InteractionRecord<K>>,
    /// Latest view per (post, user), for windowed dedup.
    pub(crate) last_view: HashMap<(K, K), DateTime<Utc>>,
}

impl<K: EntityKey> Default for State<K> {
    fn default() -> Self {
        Self {
            posts: HashMap::new(),
            categories: HashMap::new(),
            tags: HashMap::new(),
            attachments: HashMap::new(),
            post_categories: BTreeSet::new(),
            post_tags: BTreeSet::new(),
            post_attachments: BTreeSet::new(),
            likes: HashMap::new(),
            favorites: HashMap::new(),
            shares: HashMap::new(),
            views: Vec::new(),
            last_view: HashMap::new(),
        }
    }
}

impl<K: EntityKey> State<K> {
    pub(crate) fn require_post(&self, id: &K) -> StoreResult<&Post<K>> {
        self.posts.get(id).ok_or(StoreError::not_found("post"))
    }

    pub(crate) fn post_mut(&mut self, id: &K) -> StoreResult<&mut Post<K>> {
        self.posts.get_mut(id).ok_or(StoreError::not_found("post"))
    }

    pub(crate) fn categories_of(&self, post_id: &K) -> Vec<Category<K>> {
        self.post_categories
            .iter()
            .filter(|(post, _)| post == post_id)
            .filter_map(|(_, category)| self.categories.get(category).cloned())
            .collect()
    }

    pub(crate) fn tags_of(&self, post_id: &K) -> Vec<Tag<K>> {
        self.post_tags
            .iter()
            .filter(|(post, _)| post == post_id)
            .filter_map(|(_, tag)| self.tags.get(tag).cloned())
            .collect()
    }

    pub(crate) fn attachments_of(&self, post_id: &K) -> Vec<Attachment<K>> {
        self.post_attachments
            .iter()
            .filter(|(post, _)| post == post_id)
            .filter_map(|(_, attachment)| self.attachments.get(attachment).cloned())
            .collect()
    }

    /// Physically remove a post together with its edges and ledger entries.
    pub(crate) fn remove_post_cascade(&mut self, id: &K) {
        self.posts.remove(id);
        self.post_categories.retain(|(post, _)| post != id);
        self.post_tags.retain(|(post, _)| post != id);
        self.post_attachments.retain(|(post, _)| post != id);
        self.likes.retain(|(post, _), _| post != id);
        self.favorites.retain(|(post, _), _| post != id);
        self.shares.retain(|(post, _), _| post != id);
        self.views.retain(|record| &record.post_id != id);
        self.last_view.retain(|(post, _), _| post != id);
    }
}

/// In-memory store over any key type.
pub struct MemoryContentStore<K: EntityKey> {
    pub(crate) state: RwLock<State<K>>,
    pub(crate) config: MemoryStoreConfig,
    pub(crate) comments: Option<Arc<dyn CommentCountSource<K>>>,
}

impl<K: EntityKey> MemoryContentStore<K> {
    pub fn new() -> Self {
        Self::with_config(MemoryStoreConfig::default())
    }

    pub fn with_config(config: MemoryStoreConfig) -> Self {
        Self {
            state: RwLock::new(State::default()),
            config,
            comments: None,
        }
    }

    /// Wire up the external comment subsystem.
    pub fn with_comment_source(mut self, source: Arc<dyn CommentCountSource<K>>) -> Self {
        self.comments = Some(source);
        self
    }

    pub(crate) async fn comment_count(&self, post_id: &K) -> u64 {
        match &self.comments {
            Some(source) => source.comment_count(post_id).await,
            None => 0,
        }
    }

    /// Replay the ledger and rewrite all four counters.
    ///
    /// The ledger is the source of truth and the counters are a
    /// materialized view of it; this is the drift-repair path.
    pub async fn rebuild_counters(&self) {
        let mut state = self.state.write().await;

        let mut views: HashMap<K, u64> = HashMap::new();
        for record in &state.views {
            *views.entry(record.post_id.clone()).or_default() += 1;
        }
        let mut likes: HashMap<K, u64> = HashMap::new();
        for (post, _) in state.likes.keys() {
            *likes.entry(post.clone()).or_default() += 1;
        }
        let mut favorites: HashMap<K, u64> = HashMap::new();
        for (post, _) in state.favorites.keys() {
            *favorites.entry(post.clone()).or_default() += 1;
        }
        let mut shares: HashMap<K, u64> = HashMap::new();
        for (post, _) in state.shares.keys() {
            *shares.entry(post.clone()).or_default() += 1;
        }

        for (id, post) in state.posts.iter_mut() {
            post.view_count = views.get(id).copied().unwrap_or(0);
            post.like_count = likes.get(id).copied().unwrap_or(0);
            post.favorite_count = favorites.get(id).copied().unwrap_or(0);
            post.share_count = shares.get(id).copied().unwrap_or(0);
        }
    }
}

impl<K: EntityKey> Default for MemoryContentStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use quill_core::domain::PostType;
    use quill_core::ports::{PostFavoriteStore, PostLikeStore, PostStore, PostViewStore};

    use super::*;

    #[tokio::test]
    async fn rebuild_counters_matches_ledger() {
        let store = MemoryContentStore::new();
        store.create(Post::new(1u32, 9, "body", PostType::Article)).await.unwrap();
        store.like_post(&1, &100).await.unwrap();
        store.like_post(&1, &101).await.unwrap();
        store.favorite_post(&1, &100).await.unwrap();
        store.record_view(&1, &100).await.unwrap();
        store.record_view(&1, &100).await.unwrap();

        // Corrupt the materialized counters, then replay the ledger.
        store.state.write().await.posts.get_mut(&1).unwrap().like_count = 99;
        store.rebuild_counters().await;

        let post = store.find_by_id(&1).await.unwrap().unwrap();
        assert_eq!(post.like_count, 2);
        assert_eq!(post.favorite_count, 1);
        assert_eq!(post.share_count, 0);
        assert_eq!(post.view_count, 2);
    }
}
