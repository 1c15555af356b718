use uuid::Uuid;

use crate::domain::{Comment, Post, TagCloudEntry, User};
use crate::error::{DomainError, RepoError};
use crate::ports::Repositories;

/// Blog use cases on top of an entity store.
#[derive(Clone)]
pub struct BlogService {
    repos: Repositories,
}

impl BlogService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    /// Register a new user. Emails must be unique.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        fullname: &str,
    ) -> Result<User, DomainError> {
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".to_string()));
        }
        if fullname.trim().is_empty() {
            return Err(DomainError::Validation("Full name is required".to_string()));
        }

        if self.repos.users.find_by_email(email).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "Email already registered: {email}"
            )));
        }

        let user = User::new(email, password, fullname);
        Ok(self.repos.users.save(user).await?)
    }

    /// The user with this email, if the password matches exactly.
    ///
    /// An unknown email and a wrong password both yield `None`.
    pub async fn connect(&self, email: &str, password: &str) -> Result<Option<User>, RepoError> {
        let user = self.repos.users.find_by_email(email).await?;
        Ok(user.filter(|user| user.has_password(password)))
    }

    /// Create and save a post written by `author`.
    pub async fn publish(
        &self,
        author: &User,
        title: &str,
        content: &str,
    ) -> Result<Post, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::Validation("Post title is required".to_string()));
        }

        let post = Post::new(author, title, content);
        Ok(self.repos.posts.save(post).await?)
    }

    /// Append a comment to an existing post.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author: &str,
        content: &str,
    ) -> Result<Comment, DomainError> {
        if self.repos.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity_type: "Post",
                id: post_id,
            });
        }

        let comment = Comment::for_post(post_id, author, content);
        Ok(self.repos.comments.save(comment).await?)
    }

    /// Comments on a post in the order they were posted.
    pub async fn comments_of(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        self.repos.comments.find_by_post(post_id).await
    }

    /// Delete a post together with its comments.
    pub async fn delete_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        self.repos.posts.delete(post_id).await
    }

    pub async fn find_tagged_with(&self, tags: &[&str]) -> Result<Vec<Post>, RepoError> {
        self.repos.posts.find_tagged_with(tags).await
    }

    pub async fn tag_cloud(&self) -> Result<Vec<TagCloudEntry>, RepoError> {
        self.repos.posts.tag_cloud().await
    }

    /// The most recently posted entry.
    pub async fn front_post(&self) -> Result<Option<Post>, RepoError> {
        let posts = self.repos.posts.find_all_newest_first().await?;
        Ok(posts.into_iter().next())
    }
}
