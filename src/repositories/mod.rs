pub mod access_token_repository;
pub mod todo_repository;
pub mod user_repository;

pub use access_token_repository::{AccessTokenRepository, SqliteAccessTokenRepository};
pub use todo_repository::{SqliteTodoRepository, TodoRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};
