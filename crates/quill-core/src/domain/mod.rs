//! Domain entities - the core business objects.

mod attachment;
mod interaction;
mod key;
mod post;
mod statistics;
mod taxonomy;

pub use attachment::Attachment;
pub use interaction::InteractionRecord;
pub use key::EntityKey;
pub use post::{Post, PostStatus, PostType};
pub use statistics::{PostStatistics, PostSummary};
pub use taxonomy::{Category, Tag};
