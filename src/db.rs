use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        name TEXT NOT NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

const CREATE_TODOS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        completed BOOLEAN NOT NULL DEFAULT FALSE,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

const CREATE_TODOS_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_todos_user_id ON todos (user_id, created_at)";

const CREATE_ACCESS_TOKENS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS access_tokens (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        token_hash TEXT NOT NULL UNIQUE,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        expires_at INTEGER NOT NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the data directory exists
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    if !path.starts_with(":memory:") {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(error = %e, path = %parent.display(), "could not create database directory");
            }
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Create every table the service needs if it is not already there.
///
/// Each statement is `IF NOT EXISTS`, so running this against an
/// initialized database is a no-op. Existing columns are never altered.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in [
        CREATE_USERS_TABLE,
        CREATE_TODOS_TABLE,
        CREATE_TODOS_USER_INDEX,
        CREATE_ACCESS_TOKENS_TABLE,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::debug!("database schema ensured");
    Ok(())
}

/// Standalone schema initialization: create the tables, then close the
/// pool whether or not that worked.
pub async fn migrate(pool: SqlitePool) -> Result<(), sqlx::Error> {
    let result = init_schema(&pool).await;

    match &result {
        Ok(()) => tracing::info!("Database migration completed successfully"),
        Err(e) => tracing::error!(error = %e, "Migration failed"),
    }

    pool.close().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers;

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let pool = test_helpers::create_test_db().await.unwrap();

        // Already initialized once by the helper
        init_schema(&pool).await.unwrap();
        init_schema(&pool).await.unwrap();

        assert_eq!(
            table_names(&pool).await,
            vec!["access_tokens", "todos", "users"]
        );
    }

    #[tokio::test]
    async fn test_init_schema_keeps_existing_rows() {
        let pool = test_helpers::create_test_db().await.unwrap();
        let user_id = test_helpers::insert_test_user(&pool, "keep@example.com", "password")
            .await
            .unwrap();
        test_helpers::create_test_todo(&pool, user_id, "Still here")
            .await
            .unwrap();

        init_schema(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_migrate_closes_pool() {
        let pool = test_helpers::connect_memory_db().await.unwrap();
        let handle = pool.clone();

        migrate(pool).await.unwrap();

        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_migrate_closes_pool_on_failure() {
        let pool = test_helpers::connect_memory_db().await.unwrap();
        let handle = pool.clone();

        // A view named `todos` makes the index statement fail
        sqlx::query("CREATE VIEW todos AS SELECT 1 AS user_id, 2 AS created_at")
            .execute(&pool)
            .await
            .unwrap();

        assert!(migrate(pool).await.is_err());
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_create_pool_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("todos.db");
        let url = format!("sqlite://{}", db_path.display());

        let pool = create_pool(&url).await.unwrap();
        init_schema(&pool).await.unwrap();
        pool.close().await;

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_create_pool_fails_when_directory_cannot_be_created() {
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let url = format!("sqlite://{}/todos.db", blocker.path().display());

        assert!(create_pool(&url).await.is_err());
    }
}
