use crate::error::{AppError, Result};
use crate::models::{CreateTodoRequest, Todo, TodoChanges, UpdateTodoRequest};
use crate::repositories::TodoRepository;
use std::sync::Arc;

/// Ownership-scoped todo operations. `user_id` is always the authenticated
/// caller; the repository filters every statement by it.
pub struct TodoService {
    repository: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_todos(&self, user_id: i64) -> Result<Vec<Todo>> {
        self.repository.list_by_owner(user_id).await
    }

    pub async fn create_todo(&self, user_id: i64, request: CreateTodoRequest) -> Result<Todo> {
        // Validate input
        let title = match request.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => return Err(AppError::Validation("Title is required".to_string())),
        };

        let description = request.description.filter(|d| !d.is_empty());

        let todo = self.repository.create(user_id, title, description).await?;
        tracing::debug!(todo_id = todo.id, user_id, "todo created");

        Ok(todo)
    }

    pub async fn get_todo(&self, id: i64, user_id: i64) -> Result<Todo> {
        self.repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(AppError::todo_not_found)
    }

    /// Read the current row, overlay the provided fields, write it back.
    ///
    /// The read and the write are separate statements; a concurrent update
    /// between them is overwritten (last writer wins).
    pub async fn update_todo(
        &self,
        id: i64,
        user_id: i64,
        request: UpdateTodoRequest,
    ) -> Result<Todo> {
        let existing = self.get_todo(id, user_id).await?;
        let changes = TodoChanges::merge(&existing, request);

        self.repository
            .update(id, user_id, changes)
            .await?
            .ok_or_else(AppError::todo_not_found)
    }

    pub async fn delete_todo(&self, id: i64, user_id: i64) -> Result<()> {
        let deleted = self.repository.delete(id, user_id).await?;

        if deleted {
            tracing::debug!(todo_id = id, user_id, "todo deleted");
            Ok(())
        } else {
            Err(AppError::todo_not_found())
        }
    }
}
