use crate::{auth, handlers, AppState};
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn create_app(state: AppState) -> Router {
    let require_auth = middleware::from_fn_with_state(state.clone(), auth::require_auth);

    let todo_routes = Router::new()
        .route(
            "/",
            get(handlers::list_todos_handler).post(handlers::create_todo_handler),
        )
        .route(
            "/{id}",
            get(handlers::get_todo_handler)
                .put(handlers::update_todo_handler)
                .delete(handlers::delete_todo_handler),
        )
        .route_layer(require_auth.clone());

    let auth_routes = Router::new()
        .route("/me", get(auth::handlers::me_handler))
        .route_layer(require_auth)
        .route("/register", post(auth::handlers::register_handler))
        .route("/login", post(auth::handlers::login_handler));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/auth", auth_routes)
        .nest("/api/todos", todo_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
