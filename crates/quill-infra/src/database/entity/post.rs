//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::StoreError;
use quill_core::domain::{Post, PostStatus, PostType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub kind: i16,
    pub status: i16,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub view_count: i64,
    pub like_count: i64,
    pub favorite_count: i64,
    pub share_count: i64,
    /// Maintained by the external comment subsystem; read-only here.
    pub comment_count: i64,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Post<Uuid> {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = PostType::from_code(model.kind).ok_or_else(|| {
            StoreError::Unavailable(format!("unknown post type code {}", model.kind))
        })?;
        let status = PostStatus::from_code(model.status).ok_or_else(|| {
            StoreError::Unavailable(format!("unknown post status code {}", model.status))
        })?;
        Ok(Self {
            id: model.id,
            title: model.title,
            content: model.content,
            author_id: model.author_id,
            kind,
            status,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            published_at: model.published_at.map(Into::into),
            view_count: model.view_count.max(0) as u64,
            like_count: model.like_count.max(0) as u64,
            favorite_count: model.favorite_count.max(0) as u64,
            share_count: model.share_count.max(0) as u64,
            version: Some(model.version.max(0) as u64),
        })
    }
}

impl From<Post<Uuid>> for ActiveModel {
    fn from(post: Post<Uuid>) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title),
            content: Set(post.content),
            kind: Set(post.kind.code()),
            status: Set(post.status.code()),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
            published_at: Set(post.published_at.map(Into::into)),
            view_count: Set(post.view_count as i64),
            like_count: Set(post.like_count as i64),
            favorite_count: Set(post.favorite_count as i64),
            share_count: Set(post.share_count as i64),
            comment_count: Set(0),
            version: Set(post.version.unwrap_or(0) as i64),
        }
    }
}
