//! User registration and login endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Extension, Json};
use entities::User;
use serde::{Deserialize, Serialize};
use todo_store::Store;
use uuid::Uuid;

use crate::api::json_body;
use crate::error::{ServerError, ServerResult};
use crate::middleware::AuthenticatedUser;
use crate::services::Session;
use crate::state::SharedState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// A user with an access token, returned by register and login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user.into(),
            token: session.token,
        }
    }
}

/// Registers a new user.
pub async fn register<S: Store + 'static>(
    State(state): State<SharedState<S>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<SessionResponse>)> {
    let request = json_body(payload)?;

    let session = state
        .authenticator()
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Logs a user in.
pub async fn login<S: Store + 'static>(
    State(state): State<SharedState<S>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ServerResult<Json<SessionResponse>> {
    let request = json_body(payload)?;

    let session = state
        .authenticator()
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(session.into()))
}

/// Gets the current authenticated user.
pub async fn get_current_user<S: Store + 'static>(
    State(state): State<SharedState<S>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<UserResponse>> {
    // A valid token for a user that no longer exists is treated like no token.
    let db_user = state
        .credentials()
        .find_by_id(user.id)
        .await?
        .ok_or(ServerError::Unauthenticated)?;

    Ok(Json(db_user.into()))
}
