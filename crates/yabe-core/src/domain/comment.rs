use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Post;

/// Comment entity - owned by a post, written by a free-text author name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: String,
    pub content: String,
    pub posted_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment on `post`, posted now.
    pub fn new(post: &Post, author: impl Into<String>, content: impl Into<String>) -> Self {
        Self::for_post(post.id, author, content)
    }

    pub(crate) fn for_post(
        post_id: Uuid,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author: author.into(),
            content: content.into(),
            posted_at: Utc::now(),
        }
    }

    /// Override the posting date.
    pub fn posted_at(mut self, posted_at: DateTime<Utc>) -> Self {
        self.posted_at = posted_at;
        self
    }
}
