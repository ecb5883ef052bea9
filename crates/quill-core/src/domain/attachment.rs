use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::key::EntityKey;

/// Uploaded file metadata. The binary itself lives elsewhere; `location`
/// is a relative URI into that storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment<K: EntityKey> {
    pub id: K,
    pub file_name: String,
    pub size_in_bytes: u64,
    /// Lowercase hex SHA-256 of the content.
    pub sha256: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl<K: EntityKey> Attachment<K> {
    /// Two attachments with equal hash and size carry the same content,
    /// even when each upload received its own id.
    pub fn same_content(&self, other: &Attachment<K>) -> bool {
        self.size_in_bytes == other.size_in_bytes && self.sha256.eq_ignore_ascii_case(&other.sha256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(id: u32, size: u64, sha256: &str) -> Attachment<u32> {
        Attachment {
            id,
            file_name: "photo.jpg".into(),
            size_in_bytes: size,
            sha256: sha256.into(),
            location: format!("/blobs/{id}"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn same_content_ignores_id_and_case() {
        let a = attachment(1, 42, "abc123");
        let b = attachment(2, 42, "ABC123");
        assert!(a.same_content(&b));
    }

    #[test]
    fn different_size_is_different_content() {
        let a = attachment(1, 42, "abc123");
        let b = attachment(2, 43, "abc123");
        assert!(!a.same_content(&b));
    }
}
