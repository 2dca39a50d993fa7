//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::BlogService;
use blog_core::ports::{
    GroupRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use blog_infra::auth::JwtConfig;
use blog_infra::database::DatabaseConfig;
use blog_infra::{
    Argon2PasswordService, InMemoryGroupRepository, InMemoryPostRepository,
    InMemoryUserRepository, JwtTokenService,
};

#[cfg(feature = "postgres")]
use blog_infra::database::{
    DatabaseConnections, PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Which record store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    Memory,
}

impl Storage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Storage::Postgres => "postgres",
            Storage::Memory => "memory",
        }
    }
}

/// The three record repositories, built together for one store.
pub struct Repositories {
    pub posts: Arc<dyn PostRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            groups: Arc::new(InMemoryGroupRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub storage: Storage,
    pub secure_cookies: bool,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (repositories, storage) = connect(config.database.as_ref()).await;

        tracing::info!(storage = storage.as_str(), "Application state initialized");

        Self::from_parts(repositories, storage, config.jwt.clone(), config.secure_cookies)
    }

    pub fn from_parts(
        repositories: Repositories,
        storage: Storage,
        jwt: JwtConfig,
        secure_cookies: bool,
    ) -> Self {
        let Repositories {
            posts,
            groups,
            users,
        } = repositories;

        Self {
            blog: BlogService::new(posts, groups, users.clone()),
            users,
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            storage,
            secure_cookies,
        }
    }
}

#[cfg(feature = "postgres")]
async fn connect(db_config: Option<&DatabaseConfig>) -> (Repositories, Storage) {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return (Repositories::in_memory(), Storage::Memory);
    };

    match DatabaseConnections::init(config).await {
        Ok(connections) => {
            let db = connections.main;
            let repositories = Repositories {
                posts: Arc::new(PostgresPostRepository::new(db.clone())),
                groups: Arc::new(PostgresGroupRepository::new(db.clone())),
                users: Arc::new(PostgresUserRepository::new(db)),
            };
            (repositories, Storage::Postgres)
        }
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            (Repositories::in_memory(), Storage::Memory)
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn connect(_db_config: Option<&DatabaseConfig>) -> (Repositories, Storage) {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    (Repositories::in_memory(), Storage::Memory)
}
