//! API endpoints.

pub mod todos;
pub mod users;

use axum::{
    extract::rejection::JsonRejection,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use todo_store::Store;

use crate::error::{ServerError, ServerResult};
use crate::middleware::auth_middleware;
use crate::state::SharedState;

/// Creates the API router with all endpoints.
pub fn create_router<S: Store + 'static>(state: SharedState<S>) -> Router {
    // Everything here requires a valid bearer token
    let protected = Router::new()
        .route("/api/users/me", get(users::get_current_user::<S>))
        .route(
            "/api/todos",
            get(todos::list_todos::<S>).post(todos::create_todo::<S>),
        )
        .route(
            "/api/todos/{id}",
            put(todos::update_todo::<S>).delete(todos::delete_todo::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<S>,
        ));

    Router::new()
        // User endpoints
        .route("/api/users/register", post(users::register::<S>))
        .route("/api/users/login", post(users::login::<S>))
        .merge(protected)
        // Health check
        .route("/health", get(health_check))
        .with_state(state)
}

/// Unwraps a JSON body, reporting unreadable bodies as validation errors.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ServerResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ServerError::Validation(rejection.body_text()))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
