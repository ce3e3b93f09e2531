pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

use repositories::{SqliteAccessTokenRepository, SqliteTodoRepository, SqliteUserRepository};
use services::{AuthService, TodoService, UserService};

pub use routes::create_app;

#[derive(Clone)]
pub struct AppState {
    pub todo_service: Arc<TodoService>,
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Wire the SQLite repositories and services around one pool.
    pub fn new(pool: sqlx::SqlitePool, token_ttl: chrono::Duration) -> Self {
        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
        let todo_repository = Arc::new(SqliteTodoRepository::new(pool.clone()));
        let token_repository = Arc::new(SqliteAccessTokenRepository::new(pool));

        AppState {
            todo_service: Arc::new(TodoService::new(todo_repository)),
            user_service: Arc::new(UserService::new(user_repository.clone())),
            auth_service: Arc::new(AuthService::new(
                user_repository,
                token_repository,
                token_ttl,
            )),
        }
    }
}
