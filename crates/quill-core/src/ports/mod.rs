//! Ports - capability traits a storage backend implements.
//!
//! The original store hierarchy is flattened into independent mixins; a
//! single backend composes the ones it supports, and `ContentStore` is the
//! umbrella a service layer holds.

mod aggregate;
mod interactions;
mod post_store;
mod relations;

pub use aggregate::ContentAggregateStore;
pub use interactions::{
    CommentCountSource, PostFavoriteStore, PostLikeStore, PostShareStore, PostViewStore,
};
pub use post_store::PostStore;
pub use relations::{PostAttachmentStore, PostCategoryStore, PostTagStore};

use crate::domain::EntityKey;

/// Everything a full content backend provides.
pub trait ContentStore<K: EntityKey>:
    PostStore<K>
    + PostCategoryStore<K>
    + PostTagStore<K>
    + PostAttachmentStore<K>
    + PostLikeStore<K>
    + PostFavoriteStore<K>
    + PostShareStore<K>
    + PostViewStore<K>
    + ContentAggregateStore<K>
{
}

impl<T, K: EntityKey> ContentStore<K> for T where
    T: PostStore<K>
        + PostCategoryStore<K>
        + PostTagStore<K>
        + PostAttachmentStore<K>
        + PostLikeStore<K>
        + PostFavoriteStore<K>
        + PostShareStore<K>
        + PostViewStore<K>
        + ContentAggregateStore<K>
{
}
