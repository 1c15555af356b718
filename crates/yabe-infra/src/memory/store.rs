use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use yabe_core::domain::{Comment, Post, TagCloudEntry, TagIndex, User};
use yabe_core::error::RepoError;
use yabe_core::ports::{
    BaseRepository, CommentRepository, PostRepository, Repositories, UserRepository,
};

use crate::pii::mask_email;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    // Insertion order breaks ties between comments posted at the same instant.
    comments: Vec<Comment>,
}

impl Tables {
    fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|user| user.email == email)
    }

    fn posts_where(&self, predicate: impl Fn(&Post) -> bool) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .values()
            .filter(|post| predicate(post))
            .cloned()
            .collect();
        posts.sort_by(Post::cmp_oldest_first);
        posts
    }

    fn comments_where(&self, predicate: impl Fn(&Comment) -> bool) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|comment| predicate(comment))
            .cloned()
            .collect();
        comments.sort_by_key(|comment| comment.posted_at);
        comments
    }
}

/// In-memory entity store holding users, posts and comments behind a single
/// async `RwLock`, so every operation is one unit of work.
///
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Expose this store through the repository ports.
    pub fn into_repositories(self: Arc<Self>) -> Repositories {
        Repositories {
            users: self.clone(),
            posts: self.clone(),
            comments: self,
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables.user_by_email(&user.email) {
            if existing.id != user.id {
                return Err(RepoError::Constraint(format!(
                    "Email already registered: {}",
                    mask_email(&user.email)
                )));
            }
        }

        tracing::debug!(user_id = %user.id, "Saving user");
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        let authored = tables.posts.values().filter(|p| p.author_id == id).count();
        if authored > 0 {
            return Err(RepoError::Constraint(format!(
                "User {id} still authors {authored} post(s)"
            )));
        }

        if tables.users.remove(&id).is_none() {
            tracing::debug!(user_id = %id, "Delete of unknown user ignored");
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.users.len() as u64)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let tables = self.tables.read().await;
        Ok(tables.user_by_email(email).cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint(format!(
                "Post author {} does not exist",
                post.author_id
            )));
        }

        tracing::debug!(post_id = %post.id, tags = post.tags.len(), "Saving post");
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        if tables.posts.remove(&id).is_none() {
            tracing::debug!(post_id = %id, "Delete of unknown post ignored");
            return Ok(());
        }

        let before = tables.comments.len();
        tables.comments.retain(|comment| comment.post_id != id);
        tracing::debug!(
            post_id = %id,
            comments = before - tables.comments.len(),
            "Post deleted with its comments"
        );
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.posts.len() as u64)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts_where(|post| post.author_id == author_id))
    }

    async fn find_by_author_email(&self, email: &str) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let Some(author_id) = tables.user_by_email(email).map(|user| user.id) else {
            return Ok(Vec::new());
        };
        Ok(tables.posts_where(|post| post.author_id == author_id))
    }

    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts = tables.posts_where(|_| true);
        posts.sort_by(Post::cmp_newest_first);
        Ok(posts)
    }

    async fn find_tagged_with(&self, tags: &[&str]) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let matching = TagIndex::from_posts(tables.posts.values()).posts_tagged_with(tags);

        let mut posts = tables.posts_where(|post| matching.contains(&post.id));
        posts.sort_by(Post::cmp_newest_first);
        tracing::debug!(?tags, found = posts.len(), "Tag search");
        Ok(posts)
    }

    async fn tag_cloud(&self) -> Result<Vec<TagCloudEntry>, RepoError> {
        let tables = self.tables.read().await;
        Ok(TagIndex::from_posts(tables.posts.values()).cloud())
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "Commented post {} does not exist",
                comment.post_id
            )));
        }

        tracing::debug!(comment_id = %comment.id, post_id = %comment.post_id, "Saving comment");
        match tables.comments.iter_mut().find(|c| c.id == comment.id) {
            Some(existing) => *existing = comment.clone(),
            None => tables.comments.push(comment.clone()),
        }
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.retain(|comment| comment.id != id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.comments.len() as u64)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments_where(|comment| comment.post_id == post_id))
    }

    async fn find_by_post_author_email(&self, email: &str) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let Some(author_id) = tables.user_by_email(email).map(|user| user.id) else {
            return Ok(Vec::new());
        };
        Ok(tables.comments_where(|comment| {
            tables
                .posts
                .get(&comment.post_id)
                .is_some_and(|post| post.author_id == author_id)
        }))
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        let count = tables
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .count();
        Ok(count as u64)
    }
}
