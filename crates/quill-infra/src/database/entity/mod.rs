//! SeaORM entity definitions for the Postgres backend.

pub mod attachment;
pub mod category;
pub mod post;
pub mod post_attachment;
pub mod post_category;
pub mod post_favorite;
pub mod post_like;
pub mod post_share;
pub mod post_tag;
pub mod post_view;
pub mod tag;
