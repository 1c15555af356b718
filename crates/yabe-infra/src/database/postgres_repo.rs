//! PostgreSQL repository implementations.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbConn, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
};
use uuid::Uuid;

use yabe_core::domain::{Comment, Post, TagCloudEntry, TagIndex, User};
use yabe_core::error::RepoError;
use yabe_core::ports::{
    BaseRepository, CommentRepository, PostRepository, Repositories, UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, upsert, write_error};
use crate::pii::mask_email;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Expose one database through the repository ports. The repositories share
/// the connection handle rather than cloning it.
pub fn postgres_repositories(db: Arc<DbConn>) -> Repositories {
    Repositories {
        users: Arc::new(PostgresUserRepository::shared(db.clone())),
        posts: Arc::new(PostgresPostRepository::shared(db.clone())),
        comments: Arc::new(PostgresCommentRepository::shared(db)),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::PostedAt)
            .order_by_asc(comment::Column::Id)
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_post_author_email(&self, email: &str) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .inner_join(PostEntity)
            .join(JoinType::InnerJoin, post::Relation::Author.def())
            .filter(user::Column::Email.eq(email))
            .order_by_asc(comment::Column::PostedAt)
            .order_by_asc(comment::Column::Id)
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .count(&*self.db)
            .await
            .map_err(query_error)
    }
}

/// PostgreSQL post repository. Tags are stored in `post_tags` and written in
/// the same transaction as the post row.
pub struct PostgresPostRepository {
    pub(crate) db: Arc<DbConn>,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self::shared(Arc::new(db))
    }

    pub fn shared(db: Arc<DbConn>) -> Self {
        Self { db }
    }

    /// Tag names per post for the given posts.
    async fn tags_of(
        &self,
        post_ids: &[Uuid],
    ) -> Result<BTreeMap<Uuid, BTreeSet<String>>, RepoError> {
        if post_ids.is_empty() {
            return Ok(BTreeMap::new());
        }

        let rows = PostTagEntity::find()
            .filter(post_tag::Column::PostId.is_in(post_ids.iter().copied()))
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        let mut tags: BTreeMap<Uuid, BTreeSet<String>> = BTreeMap::new();
        for row in rows {
            tags.entry(row.post_id).or_default().insert(row.tag_name);
        }
        Ok(tags)
    }

    /// Attach tags to post rows, keeping the row order.
    async fn hydrate(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        let ids: Vec<Uuid> = models.iter().map(|model| model.id).collect();
        let mut tags = self.tags_of(&ids).await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let post_tags = tags.remove(&model.id).unwrap_or_default();
                model.into_post(post_tags)
            })
            .collect())
    }

    async fn write_tags<C>(db: &C, post: &Post) -> Result<(), RepoError>
    where
        C: ConnectionTrait,
    {
        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(post.id))
            .exec(db)
            .await
            .map_err(write_error)?;

        if post.tags.is_empty() {
            return Ok(());
        }

        let rows = post.tags.iter().map(|tag| post_tag::ActiveModel {
            post_id: sea_orm::Set(post.id),
            tag_name: sea_orm::Set(tag.clone()),
        });
        PostTagEntity::insert_many(rows)
            .exec_without_returning(db)
            .await
            .map_err(write_error)?;

        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(query_error)?;

        match result {
            Some(model) => Ok(self.hydrate(vec![model]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        upsert::<PostEntity, _>(&txn, post::ActiveModel::from(&post))
            .await
            .map_err(write_error)?;
        Self::write_tags(&txn, &post).await?;

        txn.commit().await.map_err(write_error)?;
        tracing::debug!(post_id = %post.id, tags = post.tags.len(), "Saved post");

        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        let comments = CommentEntity::delete_many()
            .filter(comment::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(write_error)?;
        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(write_error)?;
        let posts = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(write_error)?;

        txn.commit().await.map_err(write_error)?;
        tracing::debug!(
            post_id = %id,
            posts = posts.rows_affected,
            comments = comments.rows_affected,
            "Post deleted with its comments"
        );

        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find()
            .count(&*self.db)
            .await
            .map_err(query_error)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_asc(post::Column::PostedAt)
            .order_by_asc(post::Column::Id)
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        self.hydrate(result).await
    }

    async fn find_by_author_email(&self, email: &str) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .inner_join(UserEntity)
            .filter(user::Column::Email.eq(email))
            .order_by_asc(post::Column::PostedAt)
            .order_by_asc(post::Column::Id)
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        self.hydrate(result).await
    }

    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::PostedAt)
            .order_by_asc(post::Column::Id)
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        self.hydrate(result).await
    }

    async fn find_tagged_with(&self, tags: &[&str]) -> Result<Vec<Post>, RepoError> {
        let wanted: BTreeSet<&str> = tags.iter().copied().collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let rows = PostTagEntity::find()
            .filter(post_tag::Column::TagName.is_in(wanted.iter().copied()))
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        let index: TagIndex = rows
            .into_iter()
            .map(|row| (row.post_id, row.tag_name))
            .collect();
        let matching = index.posts_tagged_with(tags);
        if matching.is_empty() {
            return Ok(Vec::new());
        }

        let result = PostEntity::find()
            .filter(post::Column::Id.is_in(matching))
            .order_by_desc(post::Column::PostedAt)
            .order_by_asc(post::Column::Id)
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        tracing::debug!(?tags, found = result.len(), "Tag search");
        self.hydrate(result).await
    }

    async fn tag_cloud(&self) -> Result<Vec<TagCloudEntry>, RepoError> {
        let rows = PostTagEntity::find()
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        let index: TagIndex = rows
            .into_iter()
            .map(|row| (row.post_id, row.tag_name))
            .collect();
        Ok(index.cloud())
    }
}
