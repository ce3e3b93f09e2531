use crate::{
    error::Result,
    extract::{ApiJson, ApiPath},
    models::{
        AuthenticatedUser, CreateTodoRequest, MessageResponse, TodoListResponse,
        TodoMutationResponse, TodoResponse, UpdateTodoRequest,
    },
    AppState,
};
use axum::{extract::State, http::StatusCode, Extension, Json};

pub async fn list_todos_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<TodoListResponse>> {
    let todos = state.todo_service.list_todos(user.id).await?;

    Ok(Json(TodoListResponse { todos }))
}

pub async fn create_todo_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(payload): ApiJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoMutationResponse>)> {
    let todo = state.todo_service.create_todo(user.id, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(TodoMutationResponse {
            message: "Todo created successfully",
            todo,
        }),
    ))
}

pub async fn get_todo_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<TodoResponse>> {
    let todo = state.todo_service.get_todo(id, user.id).await?;

    Ok(Json(TodoResponse { todo }))
}

pub async fn update_todo_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateTodoRequest>,
) -> Result<Json<TodoMutationResponse>> {
    let todo = state.todo_service.update_todo(id, user.id, payload).await?;

    Ok(Json(TodoMutationResponse {
        message: "Todo updated successfully",
        todo,
    }))
}

pub async fn delete_todo_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>> {
    state.todo_service.delete_todo(id, user.id).await?;

    Ok(Json(MessageResponse {
        message: "Todo deleted successfully",
    }))
}
