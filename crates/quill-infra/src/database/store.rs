//! `PostgresContentStore` - every port implemented against SeaORM.
//!
//! Interaction writes run as single transactions pairing the edge mutation
//! with its counter update, so edge and counter commit or roll back
//! together; a conflict-skipped insert or a zero-row delete leaves the
//! counter untouched.

use async_trait::async_trait;
use chrono::Utc;
use futures::try_join;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, NotSet, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{
    Attachment, Category, Post, PostStatistics, PostStatus, PostSummary, PostType, Tag,
};
use quill_core::error::{StoreError, StoreResult};
use quill_core::ports::{
    ContentAggregateStore, PostAttachmentStore, PostCategoryStore, PostFavoriteStore,
    PostLikeStore, PostShareStore, PostStore, PostTagStore, PostViewStore,
};
use quill_core::query::{Page, PostQuery, UserPostsQuery};

use super::entity::{
    attachment, category, post, post_attachment, post_category, post_favorite, post_like,
    post_share, post_tag, post_view, tag,
};
use super::query::build_query;

/// PostgreSQL content store, keyed by `Uuid`.
pub struct PostgresContentStore {
    db: DbConn,
}

impl PostgresContentStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn map_db(e: DbErr) -> StoreError {
    match e {
        DbErr::RecordNotFound(name) => StoreError::NotFound {
            entity: match name.as_str() {
                "category" => "category",
                "tag" => "tag",
                "attachment" => "attachment",
                _ => "post",
            },
        },
        other => StoreError::Unavailable(other.to_string()),
    }
}

fn map_txn(e: TransactionError<DbErr>) -> StoreError {
    match e {
        TransactionError::Connection(e) => map_db(e),
        TransactionError::Transaction(e) => map_db(e),
    }
}

/// Insert failures: unique violations become `Conflict`, foreign-key
/// violations mean a referenced row is missing.
fn map_insert(entity: &'static str) -> impl Fn(DbErr) -> StoreError {
    move |e| {
        let message = e.to_string();
        if message.contains("duplicate") || message.contains("unique") {
            StoreError::conflict(entity)
        } else if message.contains("foreign key") {
            StoreError::not_found(entity)
        } else {
            StoreError::Unavailable(message)
        }
    }
}

/// Edge-insert failures: the foreign key tells us which endpoint is gone.
fn map_edge(other_entity: &'static str) -> impl Fn(DbErr) -> StoreError {
    move |e| {
        let message = e.to_string();
        if message.contains("foreign key") {
            if message.contains("post_id") {
                StoreError::not_found("post")
            } else {
                StoreError::not_found(other_entity)
            }
        } else {
            StoreError::Unavailable(message)
        }
    }
}

/// Adjust one counter column on a post. Decrements carry a `> 0` guard so
/// the counter can never go negative; increments fail if the post row is
/// gone.
async fn bump_counter<C: ConnectionTrait>(
    conn: &C,
    post_id: Uuid,
    column: post::Column,
    delta: i64,
) -> Result<(), DbErr> {
    let expr = if delta >= 0 {
        Expr::col(column).add(delta)
    } else {
        Expr::col(column).sub(-delta)
    };
    let mut update = post::Entity::update_many()
        .col_expr(column, expr)
        .filter(post::Column::Id.eq(post_id));
    if delta < 0 {
        update = update.filter(column.gt(0));
    }
    let result = update.exec(conn).await?;
    if delta > 0 && result.rows_affected == 0 {
        return Err(DbErr::RecordNotFound("post".to_owned()));
    }
    Ok(())
}

fn edge_conflict<C>(columns: [C; 2]) -> OnConflict
where
    C: sea_orm::sea_query::IntoIden,
{
    OnConflict::columns(columns).do_nothing().to_owned()
}

#[async_trait]
impl PostStore<Uuid> for PostgresContentStore {
    async fn create(&self, post: Post<Uuid>) -> StoreResult<()> {
        tracing::debug!(post_id = %post.id, "creating post");
        let model: post::ActiveModel = post.into();
        post::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(map_insert("post"))?;
        Ok(())
    }

    async fn update(&self, post: Post<Uuid>) -> StoreResult<()> {
        let id = post.id;
        let now = Utc::now();
        // Counters are ledger-owned and deliberately absent from the
        // column list.
        let mut update = post::Entity::update_many()
            .col_expr(post::Column::Title, Expr::value(post.title))
            .col_expr(post::Column::Content, Expr::value(post.content))
            .col_expr(post::Column::AuthorId, Expr::value(post.author_id))
            .col_expr(post::Column::Kind, Expr::value(post.kind.code()))
            .col_expr(post::Column::Status, Expr::value(post.status.code()))
            .col_expr(post::Column::UpdatedAt, Expr::value(now))
            .col_expr(
                post::Column::PublishedAt,
                Expr::value(post.published_at),
            )
            .filter(post::Column::Id.eq(id));
        if let Some(token) = post.version {
            update = update
                .filter(post::Column::Version.eq(token as i64))
                .col_expr(post::Column::Version, Expr::value((token + 1) as i64));
        }

        let result = update.exec(&self.db).await.map_err(map_db)?;
        if result.rows_affected == 0 {
            let exists = post::Entity::find_by_id(id)
                .count(&self.db)
                .await
                .map_err(map_db)?
                > 0;
            return Err(if exists {
                StoreError::ConcurrencyConflict
            } else {
                StoreError::not_found("post")
            });
        }
        Ok(())
    }

    async fn update_title(&self, id: &Uuid, title: &str) -> StoreResult<()> {
        let result = post::Entity::update_many()
            .col_expr(post::Column::Title, Expr::value(Some(title.to_owned())))
            .col_expr(post::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(post::Column::Id.eq(*id))
            .exec(&self.db)
            .await
            .map_err(map_db)?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("post"));
        }
        Ok(())
    }

    async fn update_content(&self, id: &Uuid, content: &str) -> StoreResult<()> {
        let result = post::Entity::update_many()
            .col_expr(post::Column::Content, Expr::value(content.to_owned()))
            .col_expr(post::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(post::Column::Id.eq(*id))
            .exec(&self.db)
            .await
            .map_err(map_db)?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("post"));
        }
        Ok(())
    }

    async fn update_type(&self, id: &Uuid, kind: PostType) -> StoreResult<()> {
        let result = post::Entity::update_many()
            .col_expr(post::Column::Kind, Expr::value(kind.code()))
            .col_expr(post::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(post::Column::Id.eq(*id))
            .exec(&self.db)
            .await
            .map_err(map_db)?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("post"));
        }
        Ok(())
    }

    async fn update_status(&self, id: &Uuid, status: PostStatus) -> StoreResult<()> {
        let now = Utc::now();
        // The status guard makes a same-status call touch zero rows, which
        // keeps the no-op silent and `updated_at` untouched.
        let mut update = post::Entity::update_many()
            .col_expr(post::Column::Status, Expr::value(status.code()))
            .col_expr(post::Column::UpdatedAt, Expr::value(now))
            .filter(post::Column::Id.eq(*id))
            .filter(post::Column::Status.ne(status.code()));
        if status == PostStatus::Published {
            update = update.col_expr(post::Column::PublishedAt, Expr::value(Some(now)));
        }

        let result = update.exec(&self.db).await.map_err(map_db)?;
        if result.rows_affected == 0 {
            let exists = post::Entity::find_by_id(*id)
                .count(&self.db)
                .await
                .map_err(map_db)?
                > 0;
            if !exists {
                return Err(StoreError::not_found("post"));
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> StoreResult<()> {
        self.delete_many(std::slice::from_ref(id)).await
    }

    async fn delete_many(&self, ids: &[Uuid]) -> StoreResult<()> {
        let mut unique = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();
        if unique.is_empty() {
            return Ok(());
        }
        let expected = unique.len() as u64;
        tracing::debug!(count = expected, "deleting post batch");

        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    // Strict batch policy: any absent id aborts the whole
                    // transaction before a single row is removed.
                    let found = post::Entity::find()
                        .filter(post::Column::Id.is_in(unique.clone()))
                        .count(txn)
                        .await?;
                    if found != expected {
                        return Err(DbErr::RecordNotFound("post".to_owned()));
                    }

                    post_category::Entity::delete_many()
                        .filter(post_category::Column::PostId.is_in(unique.clone()))
                        .exec(txn)
                        .await?;
                    post_tag::Entity::delete_many()
                        .filter(post_tag::Column::PostId.is_in(unique.clone()))
                        .exec(txn)
                        .await?;
                    post_attachment::Entity::delete_many()
                        .filter(post_attachment::Column::PostId.is_in(unique.clone()))
                        .exec(txn)
                        .await?;
                    post_like::Entity::delete_many()
                        .filter(post_like::Column::PostId.is_in(unique.clone()))
                        .exec(txn)
                        .await?;
                    post_favorite::Entity::delete_many()
                        .filter(post_favorite::Column::PostId.is_in(unique.clone()))
                        .exec(txn)
                        .await?;
                    post_share::Entity::delete_many()
                        .filter(post_share::Column::PostId.is_in(unique.clone()))
                        .exec(txn)
                        .await?;
                    post_view::Entity::delete_many()
                        .filter(post_view::Column::PostId.is_in(unique.clone()))
                        .exec(txn)
                        .await?;
                    post::Entity::delete_many()
                        .filter(post::Column::Id.is_in(unique))
                        .exec(txn)
                        .await?;
                    Ok(())
                })
            })
            .await
            .map_err(map_txn)
    }

    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<Post<Uuid>>> {
        let model = post::Entity::find_by_id(*id)
            .one(&self.db)
            .await
            .map_err(map_db)?;
        model.map(Post::try_from).transpose()
    }
}

#[async_trait]
impl PostCategoryStore<Uuid> for PostgresContentStore {
    async fn create_category(&self, category: Category<Uuid>) -> StoreResult<()> {
        let model: category::ActiveModel = category.into();
        category::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(map_insert("category"))?;
        Ok(())
    }

    async fn add_to_category(&self, post_id: &Uuid, category_id: &Uuid) -> StoreResult<()> {
        self.add_to_categories(post_id, std::slice::from_ref(category_id))
            .await
    }

    async fn add_to_categories(&self, post_id: &Uuid, category_ids: &[Uuid]) -> StoreResult<()> {
        if category_ids.is_empty() {
            return Ok(());
        }
        let rows: Vec<post_category::ActiveModel> = category_ids
            .iter()
            .map(|category_id| post_category::ActiveModel {
                post_id: Set(*post_id),
                category_id: Set(*category_id),
            })
            .collect();
        match post_category::Entity::insert_many(rows)
            .on_conflict(edge_conflict([
                post_category::Column::PostId,
                post_category::Column::CategoryId,
            ]))
            .exec(&self.db)
            .await
        {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(map_edge("category")(e)),
        }
    }

    async fn remove_from_category(&self, post_id: &Uuid, category_id: &Uuid) -> StoreResult<()> {
        self.remove_from_categories(post_id, std::slice::from_ref(category_id))
            .await
    }

    async fn remove_from_categories(
        &self,
        post_id: &Uuid,
        category_ids: &[Uuid],
    ) -> StoreResult<()> {
        post_category::Entity::delete_many()
            .filter(post_category::Column::PostId.eq(*post_id))
            .filter(post_category::Column::CategoryId.is_in(category_ids.to_vec()))
            .exec(&self.db)
            .await
            .map_err(map_db)?;
        Ok(())
    }

    async fn set_categories(&self, post_id: &Uuid, category_ids: &[Uuid]) -> StoreResult<()> {
        let post_id = *post_id;
        let mut ids = category_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    let exists = post::Entity::find_by_id(post_id).count(txn).await? > 0;
                    if !exists {
                        return Err(DbErr::RecordNotFound("post".to_owned()));
                    }
                    post_category::Entity::delete_many()
                        .filter(post_category::Column::PostId.eq(post_id))
                        .exec(txn)
                        .await?;
                    if !ids.is_empty() {
                        let rows: Vec<post_category::ActiveModel> = ids
                            .into_iter()
                            .map(|category_id| post_category::ActiveModel {
                                post_id: Set(post_id),
                                category_id: Set(category_id),
                            })
                            .collect();
                        post_category::Entity::insert_many(rows).exec(txn).await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(map_txn)
    }

    async fn categories_of(&self, post_id: &Uuid) -> StoreResult<Vec<Category<Uuid>>> {
        let edges = post_category::Entity::find()
            .filter(post_category::Column::PostId.eq(*post_id))
            .all(&self.db)
            .await
            .map_err(map_db)?;
        let ids: Vec<Uuid> = edges.into_iter().map(|edge| edge.category_id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = category::Entity::find()
            .filter(category::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(map_db)?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostTagStore<Uuid> for PostgresContentStore {
    async fn create_tag(&self, tag: Tag<Uuid>) -> StoreResult<()> {
        let model: tag::ActiveModel = tag.into();
        tag::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(map_insert("tag"))?;
        Ok(())
    }

    async fn add_tag(&self, post_id: &Uuid, tag_id: &Uuid) -> StoreResult<()> {
        self.add_tags(post_id, std::slice::from_ref(tag_id)).await
    }

    async fn add_tags(&self, post_id: &Uuid, tag_ids: &[Uuid]) -> StoreResult<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }
        let rows: Vec<post_tag::ActiveModel> = tag_ids
            .iter()
            .map(|tag_id| post_tag::ActiveModel {
                post_id: Set(*post_id),
                tag_id: Set(*tag_id),
            })
            .collect();
        match post_tag::Entity::insert_many(rows)
            .on_conflict(edge_conflict([
                post_tag::Column::PostId,
                post_tag::Column::TagId,
            ]))
            .exec(&self.db)
            .await
        {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(map_edge("tag")(e)),
        }
    }

    async fn remove_tag(&self, post_id: &Uuid, tag_id: &Uuid) -> StoreResult<()> {
        self.remove_tags(post_id, std::slice::from_ref(tag_id)).await
    }

    async fn remove_tags(&self, post_id: &Uuid, tag_ids: &[Uuid]) -> StoreResult<()> {
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(*post_id))
            .filter(post_tag::Column::TagId.is_in(tag_ids.to_vec()))
            .exec(&self.db)
            .await
            .map_err(map_db)?;
        Ok(())
    }

    async fn set_tags(&self, post_id: &Uuid, tag_ids: &[Uuid]) -> StoreResult<()> {
        let post_id = *post_id;
        let mut ids = tag_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    let exists = post::Entity::find_by_id(post_id).count(txn).await? > 0;
                    if !exists {
                        return Err(DbErr::RecordNotFound("post".to_owned()));
                    }
                    post_tag::Entity::delete_many()
                        .filter(post_tag::Column::PostId.eq(post_id))
                        .exec(txn)
                        .await?;
                    if !ids.is_empty() {
                        let rows: Vec<post_tag::ActiveModel> = ids
                            .into_iter()
                            .map(|tag_id| post_tag::ActiveModel {
                                post_id: Set(post_id),
                                tag_id: Set(tag_id),
                            })
                            .collect();
                        post_tag::Entity::insert_many(rows).exec(txn).await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(map_txn)
    }

    async fn tags_of(&self, post_id: &Uuid) -> StoreResult<Vec<Tag<Uuid>>> {
        let edges = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.eq(*post_id))
            .all(&self.db)
            .await
            .map_err(map_db)?;
        let ids: Vec<Uuid> = edges.into_iter().map(|edge| edge.tag_id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = tag::Entity::find()
            .filter(tag::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(map_db)?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostAttachmentStore<Uuid> for PostgresContentStore {
    async fn create_attachment(&self, attachment: Attachment<Uuid>) -> StoreResult<()> {
        let model: attachment::ActiveModel = attachment.into();
        attachment::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(map_insert("attachment"))?;
        Ok(())
    }

    async fn find_attachment_by_content(
        &self,
        sha256: &str,
        size_in_bytes: u64,
    ) -> StoreResult<Option<Attachment<Uuid>>> {
        let model = attachment::Entity::find()
            .filter(attachment::Column::Sha256.eq(sha256.to_lowercase()))
            .filter(attachment::Column::SizeInBytes.eq(size_in_bytes as i64))
            .one(&self.db)
            .await
            .map_err(map_db)?;
        Ok(model.map(Into::into))
    }

    async fn attach(&self, post_id: &Uuid, attachment_id: &Uuid) -> StoreResult<()> {
        self.attach_many(post_id, std::slice::from_ref(attachment_id))
            .await
    }

    async fn attach_many(&self, post_id: &Uuid, attachment_ids: &[Uuid]) -> StoreResult<()> {
        if attachment_ids.is_empty() {
            return Ok(());
        }
        let rows: Vec<post_attachment::ActiveModel> = attachment_ids
            .iter()
            .map(|attachment_id| post_attachment::ActiveModel {
                post_id: Set(*post_id),
                attachment_id: Set(*attachment_id),
            })
            .collect();
        match post_attachment::Entity::insert_many(rows)
            .on_conflict(edge_conflict([
                post_attachment::Column::PostId,
                post_attachment::Column::AttachmentId,
            ]))
            .exec(&self.db)
            .await
        {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(map_edge("attachment")(e)),
        }
    }

    async fn detach(&self, post_id: &Uuid, attachment_id: &Uuid) -> StoreResult<()> {
        self.detach_many(post_id, std::slice::from_ref(attachment_id))
            .await
    }

    async fn detach_many(&self, post_id: &Uuid, attachment_ids: &[Uuid]) -> StoreResult<()> {
        post_attachment::Entity::delete_many()
            .filter(post_attachment::Column::PostId.eq(*post_id))
            .filter(post_attachment::Column::AttachmentId.is_in(attachment_ids.to_vec()))
            .exec(&self.db)
            .await
            .map_err(map_db)?;
        Ok(())
    }

    async fn set_attachments(&self, post_id: &Uuid, attachment_ids: &[Uuid]) -> StoreResult<()> {
        let post_id = *post_id;
        let mut ids = attachment_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    let exists = post::Entity::find_by_id(post_id).count(txn).await? > 0;
                    if !exists {
                        return Err(DbErr::RecordNotFound("post".to_owned()));
                    }
                    post_attachment::Entity::delete_many()
                        .filter(post_attachment::Column::PostId.eq(post_id))
                        .exec(txn)
                        .await?;
                    if !ids.is_empty() {
                        let rows: Vec<post_attachment::ActiveModel> = ids
                            .into_iter()
                            .map(|attachment_id| post_attachment::ActiveModel {
                                post_id: Set(post_id),
                                attachment_id: Set(attachment_id),
                            })
                            .collect();
                        post_attachment::Entity::insert_many(rows).exec(txn).await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(map_txn)
    }

    async fn attachments_of(&self, post_id: &Uuid) -> StoreResult<Vec<Attachment<Uuid>>> {
        let edges = post_attachment::Entity::find()
            .filter(post_attachment::Column::PostId.eq(*post_id))
            .all(&self.db)
            .await
            .map_err(map_db)?;
        let ids: Vec<Uuid> = edges.into_iter().map(|edge| edge.attachment_id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = attachment::Entity::find()
            .filter(attachment::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(map_db)?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostLikeStore<Uuid> for PostgresContentStore {
    async fn like_post(&self, post_id: &Uuid, user_id: &Uuid) -> StoreResult<()> {
        let (post_id, user_id) = (*post_id, *user_id);
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    let edge = post_like::ActiveModel {
                        post_id: Set(post_id),
                        user_id: Set(user_id),
                        created_at: Set(Utc::now().into()),
                    };
                    let inserted = match post_like::Entity::insert(edge)
                        .on_conflict(edge_conflict([
                            post_like::Column::PostId,
                            post_like::Column::UserId,
                        ]))
                        .exec(txn)
                        .await
                    {
                        Ok(_) => true,
                        Err(DbErr::RecordNotInserted) => false,
                        Err(e) => return Err(e),
                    };
                    if inserted {
                        bump_counter(txn, post_id, post::Column::LikeCount, 1).await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(map_txn)
    }

    async fn unlike_post(&self, post_id: &Uuid, user_id: &Uuid) -> StoreResult<()> {
        let (post_id, user_id) = (*post_id, *user_id);
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    let removed = post_like::Entity::delete_many()
                        .filter(post_like::Column::PostId.eq(post_id))
                        .filter(post_like::Column::UserId.eq(user_id))
                        .exec(txn)
                        .await?
                        .rows_affected;
                    if removed > 0 {
                        bump_counter(txn, post_id, post::Column::LikeCount, -1).await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(map_txn)
    }
}

#[async_trait]
impl PostFavoriteStore<Uuid> for PostgresContentStore {
    async fn favorite_post(&self, post_id: &Uuid, user_id: &Uuid) -> StoreResult<()> {
        let (post_id, user_id) = (*post_id, *user_id);
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    let edge = post_favorite::ActiveModel {
                        post_id: Set(post_id),
                        user_id: Set(user_id),
                        created_at: Set(Utc::now().into()),
                    };
                    let inserted = match post_favorite::Entity::insert(edge)
                        .on_conflict(edge_conflict([
                            post_favorite::Column::PostId,
                            post_favorite::Column::UserId,
                        ]))
                        .exec(txn)
                        .await
                    {
                        Ok(_) => true,
                        Err(DbErr::RecordNotInserted) => false,
                        Err(e) => return Err(e),
                    };
                    if inserted {
                        bump_counter(txn, post_id, post::Column::FavoriteCount, 1).await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(map_txn)
    }

    async fn unfavorite_post(&self, post_id: &Uuid, user_id: &Uuid) -> StoreResult<()> {
        let (post_id, user_id) = (*post_id, *user_id);
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    let removed = post_favorite::Entity::delete_many()
                        .filter(post_favorite::Column::PostId.eq(post_id))
                        .filter(post_favorite::Column::UserId.eq(user_id))
                        .exec(txn)
                        .await?
                        .rows_affected;
                    if removed > 0 {
                        bump_counter(txn, post_id, post::Column::FavoriteCount, -1).await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(map_txn)
    }
}

#[async_trait]
impl PostShareStore<Uuid> for PostgresContentStore {
    async fn record_share(&self, post_id: &Uuid, user_id: &Uuid) -> StoreResult<()> {
        let (post_id, user_id) = (*post_id, *user_id);
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    let edge = post_share::ActiveModel {
                        post_id: Set(post_id),
                        user_id: Set(user_id),
                        created_at: Set(Utc::now().into()),
                    };
                    let inserted = match post_share::Entity::insert(edge)
                        .on_conflict(edge_conflict([
                            post_share::Column::PostId,
                            post_share::Column::UserId,
                        ]))
                        .exec(txn)
                        .await
                    {
                        Ok(_) => true,
                        Err(DbErr::RecordNotInserted) => false,
                        Err(e) => return Err(e),
                    };
                    if inserted {
                        bump_counter(txn, post_id, post::Column::ShareCount, 1).await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(map_txn)
    }
}

#[async_trait]
impl PostViewStore<Uuid> for PostgresContentStore {
    async fn record_view(&self, post_id: &Uuid, user_id: &Uuid) -> StoreResult<()> {
        let (post_id, user_id) = (*post_id, *user_id);
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    // Every call is an event; uniqueness is not enforced
                    // for views.
                    let event = post_view::ActiveModel {
                        id: NotSet,
                        post_id: Set(post_id),
                        user_id: Set(user_id),
                        created_at: Set(Utc::now().into()),
                    };
                    post_view::Entity::insert(event).exec(txn).await?;
                    bump_counter(txn, post_id, post::Column::ViewCount, 1).await?;
                    Ok(())
                })
            })
            .await
            .map_err(map_txn)
    }

    async fn viewed_post_ids(&self, query: UserPostsQuery<Uuid>) -> StoreResult<Page<Uuid>> {
        query.validate()?;
        let selector = post_view::Entity::find()
            .select_only()
            .column(post_view::Column::PostId)
            .column_as(post_view::Column::CreatedAt.max(), "last_viewed_at")
            .filter(post_view::Column::UserId.eq(query.user_id))
            .group_by(post_view::Column::PostId)
            .order_by(post_view::Column::CreatedAt.max(), Order::Desc)
            .order_by(post_view::Column::PostId, Order::Asc)
            .into_tuple::<(Uuid, DateTimeWithTimeZone)>();

        let paginator = selector.paginate(&self.db, query.page_size);
        let total_count = paginator.num_items().await.map_err(map_db)?;
        let rows = paginator
            .fetch_page(query.page_index - 1)
            .await
            .map_err(map_db)?;
        let ids = rows.into_iter().map(|(id, _)| id).collect();
        Ok(Page::new(ids, total_count, query.page_index, query.page_size))
    }
}

#[async_trait]
impl ContentAggregateStore<Uuid> for PostgresContentStore {
    async fn get_summary_by_id(&self, post_id: &Uuid) -> StoreResult<PostSummary<Uuid>> {
        let model = post::Entity::find_by_id(*post_id)
            .one(&self.db)
            .await
            .map_err(map_db)?
            .ok_or(StoreError::not_found("post"))?;
        let comment_count = model.comment_count.max(0) as u64;
        let post = Post::try_from(model)?;

        let (categories, tags, attachments) = try_join!(
            self.categories_of(post_id),
            self.tags_of(post_id),
            self.attachments_of(post_id),
        )?;

        let statistics = PostStatistics::of(&post, comment_count);
        Ok(PostSummary {
            post,
            categories,
            tags,
            attachments,
            statistics,
        })
    }

    async fn query_summaries(&self, query: PostQuery<Uuid>) -> StoreResult<Page<PostSummary<Uuid>>> {
        query.validate()?;
        let paginator = build_query(&query).paginate(&self.db, query.page_size);
        let total_count = paginator.num_items().await.map_err(map_db)?;
        let models = paginator
            .fetch_page(query.page_index - 1)
            .await
            .map_err(map_db)?;

        let mut summaries = Vec::with_capacity(models.len());
        for model in models {
            let comment_count = model.comment_count.max(0) as u64;
            let post = Post::try_from(model)?;
            let (categories, tags, attachments) = try_join!(
                self.categories_of(&post.id),
                self.tags_of(&post.id),
                self.attachments_of(&post.id),
            )?;
            let statistics = PostStatistics::of(&post, comment_count);
            summaries.push(PostSummary {
                post,
                categories,
                tags,
                attachments,
                statistics,
            });
        }
        Ok(Page::new(
            summaries,
            total_count,
            query.page_index,
            query.page_size,
        ))
    }
}
