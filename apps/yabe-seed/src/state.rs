//! Application state - the blog service over whichever store is configured.

use std::sync::Arc;

use yabe_core::BlogService;
use yabe_core::ports::Repositories;
use yabe_infra::InMemoryStore;
use yabe_infra::database::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "postgres")]
use yabe_infra::database::postgres_repositories;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub db: Option<Arc<DatabaseConnections>>,
}

fn in_memory() -> Repositories {
    Arc::new(InMemoryStore::new()).into_repositories()
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let (db, repos): (Option<Arc<DatabaseConnections>>, Repositories) = {
            if let Some(config) = db_config {
                match DatabaseConnections::init(config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        let repos = postgres_repositories(conn.main.clone());
                        (Some(conn), repos)
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory store.",
                            e
                        );
                        (None, in_memory())
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Using in-memory store.");
                (None, in_memory())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (db, repos): (Option<Arc<DatabaseConnections>>, Repositories) = {
            if db_config.is_some() {
                tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
            }
            (None, in_memory())
        };

        tracing::info!(database = db.is_some(), "Application state initialized");

        Self {
            blog: BlogService::new(repos),
            db,
        }
    }
}
