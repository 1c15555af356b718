//! Tags are not stored on their own: they exist as names attached to posts.
//! The [`TagIndex`] is the view computed from those attachments.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Post;

/// One row of the tag cloud: a tag name and how many posts carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCloudEntry {
    pub tag: String,
    pub pound: u64,
}

impl fmt::Display for TagCloudEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{tag={}, pound={}}}", self.tag, self.pound)
    }
}

/// Maps each tag name to the set of posts carrying it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    posts_by_tag: BTreeMap<String, BTreeSet<Uuid>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from the tag sets of `posts`.
    pub fn from_posts<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Self {
        let mut index = Self::new();
        for post in posts {
            for tag in &post.tags {
                index.insert(post.id, tag.clone());
            }
        }
        index
    }

    /// Record that `post_id` carries `tag`.
    pub fn insert(&mut self, post_id: Uuid, tag: impl Into<String>) {
        self.posts_by_tag
            .entry(tag.into())
            .or_default()
            .insert(post_id);
    }

    pub fn is_empty(&self) -> bool {
        self.posts_by_tag.is_empty()
    }

    /// Distinct tag names in ascending order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.posts_by_tag.keys().map(String::as_str)
    }

    /// Posts carrying every one of `tags`.
    ///
    /// An empty request matches nothing. Duplicates and order in `tags` are
    /// irrelevant.
    pub fn posts_tagged_with<S: AsRef<str>>(&self, tags: &[S]) -> BTreeSet<Uuid> {
        let wanted: BTreeSet<&str> = tags.iter().map(|tag| tag.as_ref()).collect();
        if wanted.is_empty() {
            return BTreeSet::new();
        }

        let mut candidates = Vec::with_capacity(wanted.len());
        for tag in wanted {
            match self.posts_by_tag.get(tag) {
                Some(posts) => candidates.push(posts),
                None => return BTreeSet::new(),
            }
        }

        // Intersect starting from the rarest tag.
        candidates.sort_by_key(|posts| posts.len());
        let (smallest, rest) = match candidates.split_first() {
            Some(split) => split,
            None => return BTreeSet::new(),
        };

        smallest
            .iter()
            .filter(|post_id| rest.iter().all(|posts| posts.contains(*post_id)))
            .copied()
            .collect()
    }

    /// Frequency table of every tag in use, sorted by tag name.
    pub fn cloud(&self) -> Vec<TagCloudEntry> {
        self.posts_by_tag
            .iter()
            .filter(|(_, posts)| !posts.is_empty())
            .map(|(tag, posts)| TagCloudEntry {
                tag: tag.clone(),
                pound: posts.len() as u64,
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(Uuid, S)> for TagIndex {
    fn from_iter<I: IntoIterator<Item = (Uuid, S)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (post_id, tag) in iter {
            index.insert(post_id, tag);
        }
        index
    }
}
