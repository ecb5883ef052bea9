//! The interaction ledger: likes, favorites, shares, views.
//!
//! Each operation takes the write guard once, so the edge mutation and its
//! counter update commit together; concurrent calls for the same
//! (post, user, kind) triple serialize on the lock and can never
//! double-increment or drive a counter below zero.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use quill_core::domain::{EntityKey, InteractionRecord, Post};
use quill_core::error::StoreResult;
use quill_core::ports::{PostFavoriteStore, PostLikeStore, PostShareStore, PostViewStore};
use quill_core::query::{Page, UserPostsQuery};

use super::{MemoryContentStore, State};

/// The unique-per-user edge kinds. Views are event-logged separately.
#[derive(Clone, Copy, Debug)]
enum UniqueKind {
    Like,
    Favorite,
    Share,
}

impl UniqueKind {
    fn ledger_mut<K: EntityKey>(
        self,
        state: &mut State<K>,
    ) -> &mut HashMap<(K, K), DateTime<Utc>> {
        match self {
            Self::Like => &mut state.likes,
            Self::Favorite => &mut state.favorites,
            Self::Share => &mut state.shares,
        }
    }

    fn counter_mut<K: EntityKey>(self, post: &mut Post<K>) -> &mut u64 {
        match self {
            Self::Like => &mut post.like_count,
            Self::Favorite => &mut post.favorite_count,
            Self::Share => &mut post.share_count,
        }
    }
}

impl<K: EntityKey> MemoryContentStore<K> {
    async fn record_unique(&self, kind: UniqueKind, post_id: &K, user_id: &K) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.require_post(post_id)?;
        let key = (post_id.clone(), user_id.clone());
        if kind.ledger_mut(&mut state).contains_key(&key) {
            // Ensure-recorded semantics: already present, nothing to do.
            return Ok(());
        }
        kind.ledger_mut(&mut state).insert(key, Utc::now());
        let post = state.post_mut(post_id)?;
        *kind.counter_mut(post) += 1;
        tracing::debug!(?kind, post_id = ?post_id, user_id = ?user_id, "interaction recorded");
        Ok(())
    }

    async fn remove_unique(&self, kind: UniqueKind, post_id: &K, user_id: &K) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let key = (post_id.clone(), user_id.clone());
        if kind.ledger_mut(&mut state).remove(&key).is_none() {
            // Absent edge: leave the counter untouched.
            return Ok(());
        }
        if let Some(post) = state.posts.get_mut(post_id) {
            let counter = kind.counter_mut(post);
            *counter = counter.saturating_sub(1);
        }
        Ok(())
    }
}

#[async_trait]
impl<K: EntityKey> PostLikeStore<K> for MemoryContentStore<K> {
    async fn like_post(&self, post_id: &K, user_id: &K) -> StoreResult<()> {
        self.record_unique(UniqueKind::Like, post_id, user_id).await
    }

    async fn unlike_post(&self, post_id: &K, user_id: &K) -> StoreResult<()> {
        self.remove_unique(UniqueKind::Like, post_id, user_id).await
    }
}

#[async_trait]
impl<K: EntityKey> PostFavoriteStore<K> for MemoryContentStore<K> {
    async fn favorite_post(&self, post_id: &K, user_id: &K) -> StoreResult<()> {
        self.record_unique(UniqueKind::Favorite, post_id, user_id).await
    }

    async fn unfavorite_post(&self, post_id: &K, user_id: &K) -> StoreResult<()> {
        self.remove_unique(UniqueKind::Favorite, post_id, user_id).await
    }
}

#[async_trait]
impl<K: EntityKey> PostShareStore<K> for MemoryContentStore<K> {
    async fn record_share(&self, post_id: &K, user_id: &K) -> StoreResult<()> {
        self.record_unique(UniqueKind::Share, post_id, user_id).await
    }
}

#[async_trait]
impl<K: EntityKey> PostViewStore<K> for MemoryContentStore<K> {
    async fn record_view(&self, post_id: &K, user_id: &K) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.require_post(post_id)?;
        let key = (post_id.clone(), user_id.clone());
        let now = Utc::now();

        if let Some(window) = self.config.view_dedup_window {
            let window = chrono::Duration::from_std(window).unwrap_or(chrono::Duration::MAX);
            if let Some(last) = state.last_view.get(&key) {
                if now - *last < window {
                    return Ok(());
                }
            }
        }

        state
            .views
            .push(InteractionRecord::new(post_id.clone(), user_id.clone()));
        state.last_view.insert(key, now);
        state.post_mut(post_id)?.view_count += 1;
        Ok(())
    }

    async fn viewed_post_ids(&self, query: UserPostsQuery<K>) -> StoreResult<Page<K>> {
        query.validate()?;
        let state = self.state.read().await;

        let mut latest: HashMap<K, DateTime<Utc>> = HashMap::new();
        for record in &state.views {
            if record.user_id != query.user_id {
                continue;
            }
            let entry = latest.entry(record.post_id.clone()).or_insert(record.created_at);
            if record.created_at > *entry {
                *entry = record.created_at;
            }
        }

        let mut ordered: Vec<(DateTime<Utc>, K)> =
            latest.into_iter().map(|(id, at)| (at, id)).collect();
        ordered.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        let ids = ordered.into_iter().map(|(_, id)| id).collect();
        Ok(Page::paginate(ids, query.page_index, query.page_size))
    }
}
