use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::key::EntityKey;

/// Category entity. Lives independently of any single post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category<K: EntityKey> {
    pub id: K,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl<K: EntityKey> Category<K> {
    pub fn new(id: K, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Tag entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag<K: EntityKey> {
    pub id: K,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl<K: EntityKey> Tag<K> {
    pub fn new(id: K, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}
