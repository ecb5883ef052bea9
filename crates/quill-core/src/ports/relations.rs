//! Many-to-many edge management between posts and their related entities.
//!
//! Edge operations are idempotent both ways: adding an edge that exists and
//! removing one that does not are silent successes. Every `set_*` is an
//! atomic clear-then-replace.

use async_trait::async_trait;

use crate::domain::{Attachment, Category, EntityKey, Tag};
use crate::error::StoreResult;

#[async_trait]
pub trait PostCategoryStore<K: EntityKey>: Send + Sync {
    /// Fails with `Conflict` if the id already exists.
    async fn create_category(&self, category: Category<K>) -> StoreResult<()>;

    async fn add_to_category(&self, post_id: &K, category_id: &K) -> StoreResult<()>;

    async fn add_to_categories(&self, post_id: &K, category_ids: &[K]) -> StoreResult<()>;

    async fn remove_from_category(&self, post_id: &K, category_id: &K) -> StoreResult<()>;

    async fn remove_from_categories(&self, post_id: &K, category_ids: &[K]) -> StoreResult<()>;

    /// Afterwards the post's category set is exactly `category_ids`.
    async fn set_categories(&self, post_id: &K, category_ids: &[K]) -> StoreResult<()>;

    async fn categories_of(&self, post_id: &K) -> StoreResult<Vec<Category<K>>>;
}

#[async_trait]
pub trait PostTagStore<K: EntityKey>: Send + Sync {
    async fn create_tag(&self, tag: Tag<K>) -> StoreResult<()>;

    async fn add_tag(&self, post_id: &K, tag_id: &K) -> StoreResult<()>;

    async fn add_tags(&self, post_id: &K, tag_ids: &[K]) -> StoreResult<()>;

    async fn remove_tag(&self, post_id: &K, tag_id: &K) -> StoreResult<()>;

    async fn remove_tags(&self, post_id: &K, tag_ids: &[K]) -> StoreResult<()>;

    async fn set_tags(&self, post_id: &K, tag_ids: &[K]) -> StoreResult<()>;

    async fn tags_of(&self, post_id: &K) -> StoreResult<Vec<Tag<K>>>;
}

#[async_trait]
pub trait PostAttachmentStore<K: EntityKey>: Send + Sync {
    async fn create_attachment(&self, attachment: Attachment<K>) -> StoreResult<()>;

    /// Look up an attachment by its logical dedup key (hash + size).
    async fn find_attachment_by_content(
        &self,
        sha256: &str,
        size_in_bytes: u64,
    ) -> StoreResult<Option<Attachment<K>>>;

    async fn attach(&self, post_id: &K, attachment_id: &K) -> StoreResult<()>;

    async fn attach_many(&self, post_id: &K, attachment_ids: &[K]) -> StoreResult<()>;

    async fn detach(&self, post_id: &K, attachment_id: &K) -> StoreResult<()>;

    async fn detach_many(&self, post_id: &K, attachment_ids: &[K]) -> StoreResult<()>;

    async fn set_attachments(&self, post_id: &K, attachment_ids: &[K]) -> StoreResult<()>;

    async fn attachments_of(&self, post_id: &K) -> StoreResult<Vec<Attachment<K>>>;
}
