use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::key::EntityKey;

/// One ledger entry: user X interacted with post Y at time T.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord<K: EntityKey> {
    pub post_id: K,
    pub user_id: K,
    pub created_at: DateTime<Utc>,
}

impl<K: EntityKey> InteractionRecord<K> {
    pub fn new(post_id: K, user_id: K) -> Self {
        Self {
            post_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}
