use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::key::EntityKey;

/// Lifecycle state of a post. Deletion is logical; the row stays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostStatus {
    Draft,
    Published,
    Deleted,
}

impl PostStatus {
    pub fn code(self) -> i16 {
        match self {
            Self::Draft => 0,
            Self::Published => 1,
            Self::Deleted => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Draft),
            1 => Some(Self::Published),
            2 => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// Content kind, affecting presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostType {
    Article,
    Video,
    Audio,
    Moment,
}

impl PostType {
    pub fn code(self) -> i16 {
        match self {
            Self::Article => 1,
            Self::Video => 2,
            Self::Audio => 3,
            Self::Moment => 4,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(Self::Article),
            2 => Some(Self::Video),
            3 => Some(Self::Audio),
            4 => Some(Self::Moment),
            _ => None,
        }
    }
}

/// Post entity.
///
/// The four interaction counters are a materialized projection of the
/// interaction ledger; the ledger is their sole writer. `published_at`
/// records the last transition into `Published` and is never cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post<K: EntityKey> {
    pub id: K,
    pub title: Option<String>,
    pub content: String,
    pub author_id: K,
    pub kind: PostType,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: u64,
    pub like_count: u64,
    pub favorite_count: u64,
    pub share_count: u64,
    /// Optimistic concurrency token; `None` means last-write-wins.
    pub version: Option<u64>,
}

impl<K: EntityKey> Post<K> {
    /// Create a new draft.
    pub fn new(id: K, author_id: K, content: impl Into<String>, kind: PostType) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: None,
            content: content.into(),
            author_id,
            kind,
            status: PostStatus::Draft,
            created_at: now,
            updated_at: now,
            published_at: None,
            view_count: 0,
            like_count: 0,
            favorite_count: 0,
            share_count: 0,
            version: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
