//! Category, tag, and attachment edge management.
//!
//! Edge adds validate both endpoints (referential integrity); removes are
//! idempotent and never error on an absent edge.

use async_trait::async_trait;

use quill_core::domain::{Attachment, Category, EntityKey, Tag};
use quill_core::error::{StoreError, StoreResult};
use quill_core::ports::{PostAttachmentStore, PostCategoryStore, PostTagStore};

use super::{MemoryContentStore, State};

impl<K: EntityKey> State<K> {
    fn require_category(&self, id: &K) -> StoreResult<()> {
        if self.categories.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::not_found("category"))
        }
    }

    fn require_tag(&self, id: &K) -> StoreResult<()> {
        if self.tags.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::not_found("tag"))
        }
    }

    fn require_attachment(&self, id: &K) -> StoreResult<()> {
        if self.attachments.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::not_found("attachment"))
        }
    }
}

#[async_trait]
impl<K: EntityKey> PostCategoryStore<K> for MemoryContentStore<K> {
    async fn create_category(&self, category: Category<K>) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.categories.contains_key(&category.id) {
            return Err(StoreError::conflict("category"));
        }
        state.categories.insert(category.id.clone(), category);
        Ok(())
    }

    async fn add_to_category(&self, post_id: &K, category_id: &K) -> StoreResult<()> {
        self.add_to_categories(post_id, std::slice::from_ref(category_id))
            .await
    }

    async fn add_to_categories(&self, post_id: &K, category_ids: &[K]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.require_post(post_id)?;
        for id in category_ids {
            state.require_category(id)?;
        }
        for id in category_ids {
            // BTreeSet insert: an existing edge stays single, silently.
            state.post_categories.insert((post_id.clone(), id.clone()));
        }
        Ok(())
    }

    async fn remove_from_category(&self, post_id: &K, category_id: &K) -> StoreResult<()> {
        self.remove_from_categories(post_id, std::slice::from_ref(category_id))
            .await
    }

    async fn remove_from_categories(&self, post_id: &K, category_ids: &[K]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        for id in category_ids {
            state.post_categories.remove(&(post_id.clone(), id.clone()));
        }
        Ok(())
    }

    async fn set_categories(&self, post_id: &K, category_ids: &[K]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.require_post(post_id)?;
        for id in category_ids {
            state.require_category(id)?;
        }
        state.post_categories.retain(|(post, _)| post != post_id);
        for id in category_ids {
            state.post_categories.insert((post_id.clone(), id.clone()));
        }
        Ok(())
    }

    async fn categories_of(&self, post_id: &K) -> StoreResult<Vec<Category<K>>> {
        let state = self.state.read().await;
        Ok(state.categories_of(post_id))
    }
}

#[async_trait]
impl<K: EntityKey> PostTagStore<K> for MemoryContentStore<K> {
    async fn create_tag(&self, tag: Tag<K>) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.tags.contains_key(&tag.id) {
            return Err(StoreError::conflict("tag"));
        }
        state.tags.insert(tag.id.clone(), tag);
        Ok(())
    }

    async fn add_tag(&self, post_id: &K, tag_id: &K) -> StoreResult<()> {
        self.add_tags(post_id, std::slice::from_ref(tag_id)).await
    }

    async fn add_tags(&self, post_id: &K, tag_ids: &[K]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.require_post(post_id)?;
        for id in tag_ids {
            state.require_tag(id)?;
        }
        for id in tag_ids {
            state.post_tags.insert((post_id.clone(), id.clone()));
        }
        Ok(())
    }

    async fn remove_tag(&self, post_id: &K, tag_id: &K) -> StoreResult<()> {
        self.remove_tags(post_id, std::slice::from_ref(tag_id)).await
    }

    async fn remove_tags(&self, post_id: &K, tag_ids: &[K]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        for id in tag_ids {
            state.post_tags.remove(&(post_id.clone(), id.clone()));
        }
        Ok(())
    }

    async fn set_tags(&self, post_id: &K, tag_ids: &[K]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.require_post(post_id)?;
        for id in tag_ids {
            state.require_tag(id)?;
        }
        state.post_tags.retain(|(post, _)| post != post_id);
        for id in tag_ids {
            state.post_tags.insert((post_id.clone(), id.clone()));
        }
        Ok(())
    }

    async fn tags_of(&self, post_id: &K) -> StoreResult<Vec<Tag<K>>> {
        let state = self.state.read().await;
        Ok(state.tags_of(post_id))
    }
}

#[async_trait]
impl<K: EntityKey> PostAttachmentStore<K> for MemoryContentStore<K> {
    async fn create_attachment(&self, attachment: Attachment<K>) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.attachments.contains_key(&attachment.id) {
            return Err(StoreError::conflict("attachment"));
        }
        state.attachments.insert(attachment.id.clone(), attachment);
        Ok(())
    }

    async fn find_attachment_by_content(
        &self,
        sha256: &str,
        size_in_bytes: u64,
    ) -> StoreResult<Option<Attachment<K>>> {
        let state = self.state.read().await;
        Ok(state
            .attachments
            .values()
            .find(|a| a.size_in_bytes == size_in_bytes && a.sha256.eq_ignore_ascii_case(sha256))
            .cloned())
    }

    async fn attach(&self, post_id: &K, attachment_id: &K) -> StoreResult<()> {
        self.attach_many(post_id, std::slice::from_ref(attachment_id))
            .await
    }

    async fn attach_many(&self, post_id: &K, attachment_ids: &[K]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.require_post(post_id)?;
        for id in attachment_ids {
            state.require_attachment(id)?;
        }
        for id in attachment_ids {
            state.post_attachments.insert((post_id.clone(), id.clone()));
        }
        Ok(())
    }

    async fn detach(&self, post_id: &K, attachment_id: &K) -> StoreResult<()> {
        self.detach_many(post_id, std::slice::from_ref(attachment_id))
            .await
    }

    async fn detach_many(&self, post_id: &K, attachment_ids: &[K]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        for id in attachment_ids {
            state.post_attachments.remove(&(post_id.clone(), id.clone()));
        }
        Ok(())
    }

    async fn set_attachments(&self, post_id: &K, attachment_ids: &[K]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.require_post(post_id)?;
        for id in attachment_ids {
            state.require_attachment(id)?;
        }
        state.post_attachments.retain(|(post, _)| post != post_id);
        for id in attachment_ids {
            state.post_attachments.insert((post_id.clone(), id.clone()));
        }
        Ok(())
    }

    async fn attachments_of(&self, post_id: &K) -> StoreResult<Vec<Attachment<K>>> {
        let state = self.state.read().await;
        Ok(state.attachments_of(post_id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use quill_core::domain::{Post, PostType};
    use quill_core::ports::PostStore;

    use super::*;

    async fn seeded() -> MemoryContentStore<u32> {
        let store = MemoryContentStore::new();
        store
            .create(Post::new(1u32, 7, "body", PostType::Article))
            .await
            .unwrap();
        for (id, name) in [(10, "rust"), (11, "databases"), (12, "testing")] {
            store.create_category(Category::new(id, name)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn adding_an_existing_edge_is_idempotent() {
        let store = seeded().await;
        store.add_to_category(&1, &10).await.unwrap();
        store.add_to_category(&1, &10).await.unwrap();
        assert_eq!(store.categories_of(&1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn removing_an_absent_edge_is_a_noop() {
        let store = seeded().await;
        store.remove_from_category(&1, &10).await.unwrap();
        assert!(store.categories_of(&1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_categories_replaces_membership_exactly() {
        let store = seeded().await;
        // Previously in {10, 12}.
        store.add_to_categories(&1, &[10, 12]).await.unwrap();

        // Set to exactly {10, 11}.
        store.set_categories(&1, &[10, 11]).await.unwrap();

        let mut ids: Vec<u32> = store
            .categories_of(&1)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![10, 11]);
    }

    #[tokio::test]
    async fn edge_to_missing_category_is_not_found() {
        let store = seeded().await;
        assert!(matches!(
            store.add_to_category(&1, &999).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn edge_from_missing_post_is_not_found() {
        let store = seeded().await;
        assert!(matches!(
            store.add_to_category(&999, &10).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn attachment_content_lookup_ignores_hash_case() {
        let store = seeded().await;
        store
            .create_attachment(Attachment {
                id: 50u32,
                file_name: "notes.pdf".into(),
                size_in_bytes: 1024,
                sha256: "deadbeef".into(),
                location: "/blobs/50".into(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let hit = store
            .find_attachment_by_content("DEADBEEF", 1024)
            .await
            .unwrap();
        assert_eq!(hit.map(|a| a.id), Some(50));
        assert!(store
            .find_attachment_by_content("deadbeef", 1025)
            .await
            .unwrap()
            .is_none());
    }
}
