//! PostgreSQL backend via SeaORM.
//!
//! Expected tables: `posts` (with the four interaction counters plus a
//! `comment_count` column the external comment subsystem maintains),
//! `categories`, `tags`, `attachments`, composite-keyed edge tables
//! `post_categories`, `post_tags`, `post_attachments`, unique-edge
//! interaction tables `post_likes`, `post_favorites`, `post_shares`, and
//! the append-only `post_views` event log. Edge tables carry foreign keys
//! to `posts`, which is what enforces referential integrity here.

mod connections;
pub mod entity;
mod query;
mod store;

pub use connections::{DatabaseConfig, connect};
pub use store::PostgresContentStore;

#[cfg(test)]
mod tests;
