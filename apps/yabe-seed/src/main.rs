//! # Yabe Seed
//!
//! Loads a named dataset into the configured entity store, then prints the
//! front post and the tag cloud as JSON.

use yabe_infra::load_fixtures;

mod config;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    let state = AppState::new(config.database.as_ref()).await;
    let repos = state.blog.repositories();

    if repos.users.count().await? == 0 {
        load_fixtures(repos, &config.dataset).await?;
    } else {
        tracing::info!(dataset = %config.dataset, "Store already populated, skipping seed");
    }

    let users = repos.users.count().await?;
    let posts = repos.posts.count().await?;
    let comments = repos.comments.count().await?;
    let store = if state.db.is_some() { "postgres" } else { "memory" };
    tracing::info!(store, users, posts, comments, "Store contents");

    let front_post = state.blog.front_post().await?;
    let front_comments = match &front_post {
        Some(post) => state.blog.comments_of(post.id).await?,
        None => Vec::new(),
    };
    let cloud = state.blog.tag_cloud().await?;

    let report = serde_json::json!({
        "users": users,
        "posts": posts,
        "comments": comments,
        "front_post": front_post,
        "front_post_comments": front_comments,
        "tag_cloud": cloud,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
