use serde::{Deserialize, Serialize};

use super::attachment::Attachment;
use super::key::EntityKey;
use super::post::Post;
use super::taxonomy::{Category, Tag};

/// Interaction counter snapshot for one post.
///
/// `comment_count` is sourced from the comment subsystem, which is external
/// to this data layer; it reads as 0 when no source is wired up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStatistics {
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub favorite_count: u64,
    pub share_count: u64,
}

impl PostStatistics {
    /// Snapshot the materialized counters of a post.
    pub fn of<K: EntityKey>(post: &Post<K>, comment_count: u64) -> Self {
        Self {
            view_count: post.view_count,
            like_count: post.like_count,
            comment_count,
            favorite_count: post.favorite_count,
            share_count: post.share_count,
        }
    }

    /// Every interaction except views.
    pub fn total_interactions(&self) -> u64 {
        self.like_count + self.comment_count + self.favorite_count + self.share_count
    }

    /// Interactions per view; views floor at 1 to keep the ratio defined.
    pub fn engagement_rate(&self) -> f64 {
        self.total_interactions() as f64 / (self.view_count.max(1)) as f64
    }
}

/// Read model: a post composed with its relations and statistics.
/// Assembled on read, never persisted. List ordering is not significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary<K: EntityKey> {
    pub post: Post<K>,
    pub categories: Vec<Category<K>>,
    pub tags: Vec<Tag<K>>,
    pub attachments: Vec<Attachment<K>>,
    pub statistics: PostStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engagement_rate_handles_zero_views() {
        let stats = PostStatistics {
            view_count: 0,
            like_count: 3,
            comment_count: 1,
            favorite_count: 0,
            share_count: 0,
        };
        assert_eq!(stats.total_interactions(), 4);
        assert_eq!(stats.engagement_rate(), 4.0);
    }

    #[test]
    fn engagement_rate_divides_by_views() {
        let stats = PostStatistics {
            view_count: 8,
            like_count: 2,
            comment_count: 1,
            favorite_count: 1,
            share_count: 0,
        };
        assert_eq!(stats.engagement_rate(), 0.5);
    }
}
