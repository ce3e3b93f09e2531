use crate::error::Result;
use crate::models::{Todo, TodoChanges};
use async_trait::async_trait;
use sqlx::SqlitePool;

const TODO_COLUMNS: &str = "id, title, description, completed, user_id, created_at, updated_at";

/// Storage for todos. Every lookup is scoped to the owning user, so a row
/// belonging to someone else behaves exactly like a missing row.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait TodoRepository: Send + Sync {
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Todo>>;
    async fn create(
        &self,
        user_id: i64,
        title: String,
        description: Option<String>,
    ) -> Result<Todo>;
    async fn find_by_id(&self, id: i64, user_id: i64) -> Result<Option<Todo>>;
    async fn update(&self, id: i64, user_id: i64, changes: TodoChanges) -> Result<Option<Todo>>;
    async fn delete(&self, id: i64, user_id: i64) -> Result<bool>;
}

pub struct SqliteTodoRepository {
    pool: SqlitePool,
}

impl SqliteTodoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE user_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    async fn create(
        &self,
        user_id: i64,
        title: String,
        description: Option<String>,
    ) -> Result<Todo> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            r#"
            INSERT INTO todos (title, description, user_id)
            VALUES (?, ?, ?)
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(title)
        .bind(description)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn find_by_id(&self, id: i64, user_id: i64) -> Result<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn update(&self, id: i64, user_id: i64, changes: TodoChanges) -> Result<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            r#"
            UPDATE todos
            SET title = ?, description = ?, completed = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND user_id = ?
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.completed)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
