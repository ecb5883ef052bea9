//! Structured queries, pagination math, and ranking.

mod page;
mod params;
pub mod rank;

pub use page::Page;
pub use params::{PostQuery, SortOrder, UserPostsQuery};
