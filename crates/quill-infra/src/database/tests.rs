use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait, Value};
use uuid::Uuid;

use quill_core::StoreError;
use quill_core::domain::{PostStatus, PostType};
use quill_core::ports::{PostLikeStore, PostStore};
use quill_core::query::{PostQuery, SortOrder};

use super::entity::{post, post_like};
use super::query::build_query;
use super::store::PostgresContentStore;

fn sample_model(post_id: Uuid, author_id: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id: post_id,
        author_id,
        title: Some("Sample".to_owned()),
        content: "body".to_owned(),
        kind: PostType::Article.code(),
        status: PostStatus::Published.code(),
        created_at: now.into(),
        updated_at: now.into(),
        published_at: Some(now.into()),
        view_count: 10,
        like_count: 4,
        favorite_count: 2,
        share_count: 1,
        comment_count: 3,
        version: 5,
    }
}

#[tokio::test]
async fn find_by_id_maps_row_to_domain() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![sample_model(post_id, author_id)]])
        .into_connection();

    let store = PostgresContentStore::new(db);
    let found = store.find_by_id(&post_id).await.unwrap().unwrap();

    assert_eq!(found.id, post_id);
    assert_eq!(found.author_id, author_id);
    assert_eq!(found.kind, PostType::Article);
    assert_eq!(found.status, PostStatus::Published);
    assert_eq!(found.like_count, 4);
    assert_eq!(found.version, Some(5));
}

#[tokio::test]
async fn find_by_id_returns_none_for_missing_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let store = PostgresContentStore::new(db);
    let found = store.find_by_id(&Uuid::new_v4()).await.unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn update_title_on_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let store = PostgresContentStore::new(db);
    let result = store.update_title(&Uuid::new_v4(), "renamed").await;

    assert!(matches!(
        result,
        Err(StoreError::NotFound { entity: "post" })
    ));
}

#[tokio::test]
async fn unlike_decrements_only_after_edge_removal() {
    // First exec removes the edge row, second is the counter decrement.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ])
        .into_connection();

    let store = PostgresContentStore::new(db);
    store
        .unlike_post(&Uuid::new_v4(), &Uuid::new_v4())
        .await
        .unwrap();
}

#[tokio::test]
async fn unlike_without_edge_skips_counter_update() {
    // Only the delete runs; no second exec result is consumed.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let store = PostgresContentStore::new(db);
    store
        .unlike_post(&Uuid::new_v4(), &Uuid::new_v4())
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_like_skips_counter_bump() {
    // ON CONFLICT DO NOTHING returns no row when the edge already exists,
    // which surfaces as `RecordNotInserted`. Only the insert's empty query
    // result is queued, so any counter update would hit the exhausted
    // exec buffer and fail the transaction.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post_like::Model>::new()])
        .into_connection();

    let store = PostgresContentStore::new(db);
    store
        .like_post(&Uuid::new_v4(), &Uuid::new_v4())
        .await
        .unwrap();
}

#[tokio::test]
async fn batch_delete_aborts_when_an_id_is_missing() {
    // The in-transaction existence check sees one of the two requested
    // rows; the batch must fail before any delete statement runs (none
    // are queued).
    let count_row = BTreeMap::from([("num_items", Value::BigInt(Some(1)))]);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row]])
        .into_connection();

    let store = PostgresContentStore::new(db);
    let result = store.delete_many(&[Uuid::new_v4(), Uuid::new_v4()]).await;

    assert!(matches!(
        result,
        Err(StoreError::NotFound { entity: "post" })
    ));
}

#[test]
fn popularity_sort_lands_in_sql_with_id_tiebreak() {
    let mut query = PostQuery::<Uuid>::default();
    query.sort = SortOrder::MostPopular;

    let sql = build_query(&query)
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(sql.contains("like_count * 2 + favorite_count + comment_count + view_count * 0.1"));
    assert!(sql.contains(r#""id" ASC"#));
}

#[test]
fn keyword_filter_uses_escaped_ilike_on_title_and_content() {
    let mut query = PostQuery::<Uuid>::default();
    query.keyword = Some("100%_done".to_owned());

    let sql = build_query(&query)
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(sql.contains("ILIKE"));
    assert!(sql.contains(r"100\%\_done"));
    assert!(sql.contains(r#""title""#));
    assert!(sql.contains(r#""content""#));
}

#[test]
fn category_filter_becomes_subquery() {
    let mut query = PostQuery::<Uuid>::default();
    query.category_id = Some(Uuid::new_v4());

    let sql = build_query(&query)
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(sql.contains(r#"IN (SELECT "post_id" FROM "post_categories""#));
}
