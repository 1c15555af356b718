//! Domain entities - the core business objects.

mod comment;
mod post;
mod tag;
mod user;

pub use comment::Comment;
pub use post::Post;
pub use tag::{TagCloudEntry, TagIndex};
pub use user::User;
