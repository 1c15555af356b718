use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// Post entity - a blog entry written by exactly one user.
///
/// Comments are owned by the post but live in their own repository; tags are
/// kept inline as a set of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub posted_at: DateTime<Utc>,
    pub tags: BTreeSet<String>,
}

impl Post {
    /// Create a new untagged post, posted now.
    pub fn new(author: &User, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id: author.id,
            title: title.into(),
            content: content.into(),
            posted_at: Utc::now(),
            tags: BTreeSet::new(),
        }
    }

    /// Override the posting date.
    pub fn posted_at(mut self, posted_at: DateTime<Utc>) -> Self {
        self.posted_at = posted_at;
        self
    }

    /// Attach a tag. Tagging twice with the same name is a no-op.
    ///
    /// Nothing is persisted until the post is saved.
    pub fn tag_it_with(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn is_tagged_with(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Newest first, ties broken by id.
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        other
            .posted_at
            .cmp(&self.posted_at)
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Oldest first, ties broken by id.
    pub fn cmp_oldest_first(&self, other: &Self) -> Ordering {
        self.posted_at
            .cmp(&other.posted_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}
