//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::BlogService;
use yatube_infra::InMemoryStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub login_url: String,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let blog = Self::build_service(config).await;
        tracing::info!("Application state initialized");

        Self {
            blog,
            login_url: config.login_url.clone(),
        }
    }

    /// State over a fresh in-memory store.
    #[cfg(test)]
    pub fn in_memory(login_url: impl Into<String>) -> Self {
        Self {
            blog: in_memory_service(),
            login_url: login_url.into(),
        }
    }

    #[cfg(feature = "postgres")]
    async fn build_service(config: &AppConfig) -> BlogService {
        use yatube_infra::PostgresRepositories;
        use yatube_infra::database::connect;

        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return in_memory_service();
        };

        match connect(db_config).await {
            Ok(conn) => {
                let repos = PostgresRepositories::new(conn);
                BlogService::new(repos.users, repos.groups, repos.posts)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                in_memory_service()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn build_service(config: &AppConfig) -> BlogService {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        tracing::info!("Running without postgres feature - using in-memory store");
        in_memory_service()
    }
}

fn in_memory_service() -> BlogService {
    let store = Arc::new(InMemoryStore::new());
    BlogService::new(store.clone(), store.clone(), store)
}
