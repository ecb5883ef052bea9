use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::Attachment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub file_name: String,
    pub size_in_bytes: i64,
    /// Lowercase hex, normalized on write so the (hash, size) dedup key
    /// can be an exact index lookup.
    pub sha256: String,
    pub location: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Attachment<Uuid> {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            file_name: model.file_name,
            size_in_bytes: model.size_in_bytes.max(0) as u64,
            sha256: model.sha256,
            location: model.location,
            created_at: model.created_at.into(),
        }
    }
}

impl From<Attachment<Uuid>> for ActiveModel {
    fn from(attachment: Attachment<Uuid>) -> Self {
        Self {
            id: Set(attachment.id),
            file_name: Set(attachment.file_name),
            size_in_bytes: Set(attachment.size_in_bytes as i64),
            sha256: Set(attachment.sha256.to_lowercase()),
            location: Set(attachment.location),
            created_at: Set(attachment.created_at.into()),
        }
    }
}
