//! Ranking keys and the deterministic comparison they share.
//!
//! Every sort order compares `(primary key, post id)`; the id leg is always
//! ascending, so pagination stays stable across pages even when primary
//! values tie.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domain::{EntityKey, Post, PostStatistics};

use super::params::SortOrder;

/// Composite popularity score: likes weigh double, favorites and comments
/// weigh single, views weigh a tenth.
pub fn popularity_score(stats: &PostStatistics) -> f64 {
    stats.like_count as f64 * 2.0
        + stats.favorite_count as f64
        + stats.comment_count as f64
        + stats.view_count as f64 * 0.1
}

/// Primary sort value of a post under one ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RankKey {
    Timestamp(DateTime<Utc>),
    Score(f64),
    Count(u64),
}

impl RankKey {
    pub fn of<K: EntityKey>(sort: SortOrder, post: &Post<K>, comment_count: u64) -> Self {
        match sort {
            SortOrder::Newest => Self::Timestamp(post.created_at),
            SortOrder::MostPopular => {
                Self::Score(popularity_score(&PostStatistics::of(post, comment_count)))
            }
            SortOrder::MostCommented => Self::Count(comment_count),
            SortOrder::MostViewed => Self::Count(post.view_count),
            SortOrder::MostFavorited => Self::Count(post.favorite_count),
        }
    }

    fn cmp_ascending(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::Score(a), Self::Score(b)) => a.total_cmp(b),
            (Self::Count(a), Self::Count(b)) => a.cmp(b),
            // Keys of mixed variants never meet within one query.
            _ => Ordering::Equal,
        }
    }
}

/// Compare two `(rank key, id)` pairs. The id tie-break is ascending
/// regardless of direction.
pub fn compare<K: Ord>(a: &(RankKey, K), b: &(RankKey, K), descending: bool) -> Ordering {
    let primary = if descending {
        b.0.cmp_ascending(&a.0)
    } else {
        a.0.cmp_ascending(&b.0)
    };
    primary.then_with(|| a.1.cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(view: u64, like: u64, comment: u64, favorite: u64) -> PostStatistics {
        PostStatistics {
            view_count: view,
            like_count: like,
            comment_count: comment,
            favorite_count: favorite,
            share_count: 0,
        }
    }

    #[test]
    fn popularity_blends_counters() {
        // like*2 + favorite + comment + view*0.1
        assert_eq!(popularity_score(&stats(50, 10, 2, 3)), 30.0);
        assert_eq!(popularity_score(&stats(200, 3, 1, 1)), 28.0);
    }

    #[test]
    fn descending_with_ascending_id_tie_break() {
        let mut keyed = vec![
            (RankKey::Count(5), 30u32),
            (RankKey::Count(9), 20),
            (RankKey::Count(5), 10),
        ];
        keyed.sort_by(|a, b| compare(a, b, true));
        let ids: Vec<u32> = keyed.into_iter().map(|(_, id)| id).collect();
        assert_eq!(ids, vec![20, 10, 30]);
    }

    #[test]
    fn ascending_keeps_id_tie_break_ascending() {
        let mut keyed = vec![
            (RankKey::Count(5), 30u32),
            (RankKey::Count(5), 10),
            (RankKey::Count(9), 20),
        ];
        keyed.sort_by(|a, b| compare(a, b, false));
        let ids: Vec<u32> = keyed.into_iter().map(|(_, id)| id).collect();
        assert_eq!(ids, vec![10, 30, 20]);
    }
}
