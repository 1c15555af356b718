//! Named datasets built in code, used to seed an entity store for tests and demos.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};

use yabe_core::domain::{Comment, Post, User};
use yabe_core::error::RepoError;
use yabe_core::ports::Repositories;

/// Fixture loading errors.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Invalid fixture date: {0}")]
    InvalidDate(String),

    #[error(transparent)]
    Repository(#[from] RepoError),
}

/// Datasets that can be loaded by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Two users, three posts, three comments.
    Blog,
}

impl FromStr for Dataset {
    type Err = FixtureError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "blog" => Ok(Dataset::Blog),
            _ => Err(FixtureError::UnknownDataset(name.to_string())),
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Blog => write!(f, "blog"),
        }
    }
}

/// Everything the `blog` dataset created, for assertions.
#[derive(Debug, Clone)]
pub struct BlogFixture {
    pub bob: User,
    pub jeff: User,
    pub model_layer: Post,
    pub yabe_test: Post,
    pub mvc_application: Post,
    pub comments: Vec<Comment>,
}

/// What a call to [`load_fixtures`] seeded.
#[derive(Debug, Clone)]
pub enum LoadedFixture {
    Blog(BlogFixture),
}

/// Load the dataset called `name` into the store behind `repos`.
pub async fn load_fixtures(
    repos: &Repositories,
    name: &str,
) -> Result<LoadedFixture, FixtureError> {
    let dataset: Dataset = name.parse()?;
    tracing::info!(%dataset, "Loading fixtures");

    match dataset {
        Dataset::Blog => Ok(LoadedFixture::Blog(load_blog(repos).await?)),
    }
}

/// Seed the `blog` dataset.
pub async fn load_blog(repos: &Repositories) -> Result<BlogFixture, FixtureError> {
    let bob = repos
        .users
        .save(User::new("bob@gmail.com", "secret", "Bob"))
        .await?;
    let jeff = repos
        .users
        .save(User::new("jeff@gmail.com", "secret", "Jeff"))
        .await?;

    let model_layer = Post::new(
        &bob,
        "About the model layer",
        "The model has a central position in a web application. It is the \
         domain-specific representation of the information on which the \
         application operates.",
    )
    .posted_at(date(2009, 6, 14)?)
    .tag_it_with("play")
    .tag_it_with("architecture");

    let yabe_test = Post::new(&bob, "Just a test of YABE", "Well, it's just a test.")
        .posted_at(date(2009, 3, 25)?)
        .tag_it_with("play")
        .tag_it_with("test");

    let mvc_application = Post::new(
        &jeff,
        "The MVC application",
        "A web application follows the MVC architectural pattern: models hold \
         the data, views render it and controllers react to requests.",
    )
    .posted_at(date(2009, 6, 6)?)
    .tag_it_with("play")
    .tag_it_with("mvc");

    let model_layer = repos.posts.save(model_layer).await?;
    let yabe_test = repos.posts.save(yabe_test).await?;
    let mvc_application = repos.posts.save(mvc_application).await?;

    let comments = vec![
        Comment::new(&model_layer, "Guest", "You are right !").posted_at(date(2009, 6, 14)?),
        Comment::new(&model_layer, "Mike", "I knew that ...").posted_at(date(2009, 6, 15)?),
        Comment::new(&yabe_test, "Tom", "This post is useless ?").posted_at(date(2009, 4, 5)?),
    ];

    let mut saved = Vec::with_capacity(comments.len());
    for comment in comments {
        saved.push(repos.comments.save(comment).await?);
    }

    tracing::info!(users = 2, posts = 3, comments = saved.len(), "Blog dataset loaded");

    Ok(BlogFixture {
        bob,
        jeff,
        model_layer,
        yabe_test,
        mvc_application,
        comments: saved,
    })
}

fn date(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>, FixtureError> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| FixtureError::InvalidDate(format!("{year}-{month:02}-{day:02}")))
}
