use crate::{
    error::{AppError, Result},
    extract::ApiJson,
    models::{AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest, UserResponse},
    services::user_service::CreateUserRequest,
    AppState,
};
use axum::{extract::State, http::StatusCode, Extension, Json};

pub async fn register_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let user = state
        .user_service
        .create_user(CreateUserRequest {
            email: payload.email,
            password: payload.password,
            name: payload.name,
        })
        .await?;

    // Not atomic with the insert: if issuing fails the account exists and
    // the client can log in instead of registering again.
    let token = state.auth_service.issue_token(user.id).await?;
    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            user,
            token,
        }),
    ))
}

pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = state.auth_service.authenticate(payload).await?;
    let token = state.auth_service.issue_token(user.id).await?;
    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(AuthResponse {
        message: "Login successful",
        user,
        token,
    }))
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>> {
    let user = state
        .user_service
        .find_user_by_id(caller.id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(UserResponse { user }))
}
