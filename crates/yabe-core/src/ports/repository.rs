use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, TagCloudEntry, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Deleting a missing entity is a no-op.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;

    /// Number of stored entities.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// User repository with domain-specific methods.
///
/// Emails are unique, and a user who still authors posts cannot be deleted.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// `delete` also removes the post's comments and tag associations in the
/// same unit of work.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts written by a user, oldest first.
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Posts written by the user with this email, oldest first.
    async fn find_by_author_email(&self, email: &str) -> Result<Vec<Post>, RepoError>;

    /// Every post, newest first.
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError>;

    /// Posts carrying all of `tags`, newest first. An empty `tags` matches nothing.
    async fn find_tagged_with(&self, tags: &[&str]) -> Result<Vec<Post>, RepoError>;

    /// How many posts carry each tag in use, sorted by tag name.
    async fn tag_cloud(&self) -> Result<Vec<TagCloudEntry>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, oldest first.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Comments on any post written by the user with this email, oldest first.
    async fn find_by_post_author_email(&self, email: &str) -> Result<Vec<Comment>, RepoError>;

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}

/// The full set of repositories backing one entity store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}
