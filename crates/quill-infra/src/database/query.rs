//! Query pushdown: translate a `PostQuery` into one SQL statement with
//! conjunctive filters, the requested ordering, and the ascending-id
//! tie-break.

use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{ColumnTrait, Condition, EntityTrait, Order, QueryFilter, QueryOrder, Select};
use uuid::Uuid;

use quill_core::query::{PostQuery, SortOrder};

use super::entity::{post, post_category, post_tag};

/// The popularity blend, evaluated in the database so ordering and
/// pagination stay consistent with the in-memory engine.
const POPULARITY_EXPR: &str =
    "like_count * 2 + favorite_count + comment_count + view_count * 0.1";

fn escape_like(keyword: &str) -> String {
    keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub(crate) fn build_query(query: &PostQuery<Uuid>) -> Select<post::Entity> {
    let mut select =
        post::Entity::find().filter(post::Column::Status.eq(query.status.code()));

    if let Some(kind) = query.kind {
        select = select.filter(post::Column::Kind.eq(kind.code()));
    }
    if let Some(author_id) = query.author_id {
        select = select.filter(post::Column::AuthorId.eq(author_id));
    }
    if let Some(keyword) = &query.keyword {
        let pattern = format!("%{}%", escape_like(keyword));
        select = select.filter(
            Condition::any()
                .add(Expr::col(post::Column::Title).ilike(pattern.clone()))
                .add(Expr::col(post::Column::Content).ilike(pattern)),
        );
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(
            post::Column::Id.in_subquery(
                Query::select()
                    .column(post_category::Column::PostId)
                    .from(post_category::Entity)
                    .and_where(post_category::Column::CategoryId.eq(category_id))
                    .to_owned(),
            ),
        );
    }
    if let Some(tag_id) = query.tag_id {
        select = select.filter(
            post::Column::Id.in_subquery(
                Query::select()
                    .column(post_tag::Column::PostId)
                    .from(post_tag::Entity)
                    .and_where(post_tag::Column::TagId.eq(tag_id))
                    .to_owned(),
            ),
        );
    }

    let direction = if query.descending {
        Order::Desc
    } else {
        Order::Asc
    };
    let select = match query.sort {
        SortOrder::Newest => select.order_by(post::Column::CreatedAt, direction),
        SortOrder::MostPopular => select.order_by(Expr::cust(POPULARITY_EXPR), direction),
        SortOrder::MostCommented => select.order_by(post::Column::CommentCount, direction),
        SortOrder::MostViewed => select.order_by(post::Column::ViewCount, direction),
        SortOrder::MostFavorited => select.order_by(post::Column::FavoriteCount, direction),
    };
    select.order_by(post::Column::Id, Order::Asc)
}
