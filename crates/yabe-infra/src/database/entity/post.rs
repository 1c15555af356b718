//! Post entity for SeaORM. Tags live in [`super::post_tag`].

use std::collections::BTreeSet;

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub posted_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Author,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
    #[sea_orm(has_many = "super::post_tag::Entity")]
    Tags,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::post_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Build the domain Post from this row and its tag names.
    pub fn into_post(self, tags: BTreeSet<String>) -> yabe_core::domain::Post {
        yabe_core::domain::Post {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            content: self.content,
            posted_at: self.posted_at.into(),
            tags,
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel. Tags are written separately.
impl From<&yabe_core::domain::Post> for ActiveModel {
    fn from(post: &yabe_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title.clone()),
            content: Set(post.content.clone()),
            posted_at: Set(post.posted_at.into()),
        }
    }
}
