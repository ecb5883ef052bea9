use serde::{Deserialize, Serialize};

use crate::domain::{EntityKey, PostStatus, PostType};
use crate::error::{StoreError, StoreResult};

/// Ranking criteria for post queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Newest,
    MostPopular,
    MostCommented,
    MostViewed,
    MostFavorited,
}

/// Multi-criteria post query. All supplied filters are conjunctive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostQuery<K: EntityKey> {
    /// 1-based.
    pub page_index: u64,
    pub page_size: u64,
    pub status: PostStatus,
    pub kind: Option<PostType>,
    /// Case-insensitive substring match against title and content.
    pub keyword: Option<String>,
    pub category_id: Option<K>,
    pub tag_id: Option<K>,
    pub author_id: Option<K>,
    pub sort: SortOrder,
    pub descending: bool,
}

impl<K: EntityKey> Default for PostQuery<K> {
    fn default() -> Self {
        Self {
            page_index: 1,
            page_size: 20,
            status: PostStatus::Published,
            kind: None,
            keyword: None,
            category_id: None,
            tag_id: None,
            author_id: None,
            sort: SortOrder::Newest,
            descending: true,
        }
    }
}

impl<K: EntityKey> PostQuery<K> {
    /// Reject malformed pagination before any store access.
    pub fn validate(&self) -> StoreResult<()> {
        validate_pagination(self.page_index, self.page_size)
    }
}

/// Per-user history query (viewed posts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPostsQuery<K: EntityKey> {
    pub user_id: K,
    pub page_index: u64,
    pub page_size: u64,
}

impl<K: EntityKey> UserPostsQuery<K> {
    pub fn new(user_id: K) -> Self {
        Self {
            user_id,
            page_index: 1,
            page_size: 20,
        }
    }

    pub fn validate(&self) -> StoreResult<()> {
        validate_pagination(self.page_index, self.page_size)
    }
}

fn validate_pagination(page_index: u64, page_size: u64) -> StoreResult<()> {
    if page_index == 0 {
        return Err(StoreError::invalid("page_index must be >= 1"));
    }
    if page_size == 0 {
        return Err(StoreError::invalid("page_size must be >= 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let query = PostQuery::<u32>::default();
        assert_eq!(query.page_index, 1);
        assert_eq!(query.page_size, 20);
        assert_eq!(query.status, PostStatus::Published);
        assert_eq!(query.sort, SortOrder::Newest);
        assert!(query.descending);
    }

    #[test]
    fn key_type_is_fully_generic() {
        // Uuid satisfies the same key bounds as the integer keys used
        // elsewhere in the tests; nothing identifier-specific leaks in.
        let query = PostQuery::<uuid::Uuid> {
            author_id: Some(uuid::Uuid::new_v4()),
            category_id: Some(uuid::Uuid::new_v4()),
            ..Default::default()
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let query = PostQuery::<u32> {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            query.validate(),
            Err(StoreError::InvalidArgument(_))
        ));
    }
}
