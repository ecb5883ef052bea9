//! `PostStore` implementation: CRUD and partial updates.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;

use quill_core::domain::{EntityKey, Post, PostStatus, PostType};
use quill_core::error::{StoreError, StoreResult};
use quill_core::ports::PostStore;

use super::MemoryContentStore;

#[async_trait]
impl<K: EntityKey> PostStore<K> for MemoryContentStore<K> {
    async fn create(&self, post: Post<K>) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.posts.contains_key(&post.id) {
            return Err(StoreError::conflict("post"));
        }
        tracing::debug!(post_id = ?post.id, "creating post");
        state.posts.insert(post.id.clone(), post);
        Ok(())
    }

    async fn update(&self, post: Post<K>) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let current = state.post_mut(&post.id)?;

        let next_version = match post.version {
            Some(token) => {
                if current.version != Some(token) {
                    return Err(StoreError::ConcurrencyConflict);
                }
                Some(token + 1)
            }
            None => current.version,
        };

        let mut next = post;
        // The ledger owns the counters; a full replace cannot touch them.
        next.view_count = current.view_count;
        next.like_count = current.like_count;
        next.favorite_count = current.favorite_count;
        next.share_count = current.share_count;
        next.updated_at = Utc::now();
        next.version = next_version;
        *current = next;
        Ok(())
    }

    async fn update_title(&self, id: &K, title: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let post = state.post_mut(id)?;
        post.title = Some(title.to_owned());
        post.updated_at = Utc::now();
        Ok(())
    }

    async fn update_content(&self, id: &K, content: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let post = state.post_mut(id)?;
        post.content = content.to_owned();
        post.updated_at = Utc::now();
        Ok(())
    }

    async fn update_type(&self, id: &K, kind: PostType) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let post = state.post_mut(id)?;
        post.kind = kind;
        post.updated_at = Utc::now();
        Ok(())
    }

    async fn update_status(&self, id: &K, status: PostStatus) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let post = state.post_mut(id)?;
        if post.status == status {
            // Setting the current status again is a silent no-op.
            return Ok(());
        }
        let now = Utc::now();
        post.status = status;
        post.updated_at = now;
        if status == PostStatus::Published {
            // Refreshed on every publish, never cleared on unpublish.
            post.published_at = Some(now);
        }
        Ok(())
    }

    async fn delete(&self, id: &K) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.require_post(id)?;
        state.remove_post_cascade(id);
        Ok(())
    }

    async fn delete_many(&self, ids: &[K]) -> StoreResult<()> {
        let unique: BTreeSet<&K> = ids.iter().collect();
        let mut state = self.state.write().await;
        // Strict batch policy: any absent id fails the whole batch and
        // nothing is deleted.
        for id in &unique {
            state.require_post(id)?;
        }
        tracing::debug!(count = unique.len(), "deleting post batch");
        for id in unique {
            state.remove_post_cascade(id);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &K) -> StoreResult<Option<Post<K>>> {
        let state = self.state.read().await;
        Ok(state.posts.get(id).cloned())
    }
}
