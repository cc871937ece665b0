//! Authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use todo_store::Store;
use uuid::Uuid;

use crate::error::ServerError;
use crate::state::SharedState;

/// The actor behind a protected request, resolved from its access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User ID.
    pub id: Uuid,
}

/// Extracts the bearer token from the Authorization header.
fn extract_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(auth::extract_bearer_token)
}

/// Authentication middleware.
///
/// Validates the bearer token and stores the [`AuthenticatedUser`] in the
/// request extensions. Missing, malformed, invalid and expired tokens are all
/// rejected with the same `Unauthenticated` response. The user record is not
/// loaded here.
pub async fn auth_middleware<S: Store + 'static>(
    State(state): State<SharedState<S>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(token) = extract_token(&request) else {
        tracing::debug!("Missing or malformed authorization header");
        return Err(ServerError::Unauthenticated);
    };

    let user_id = state.jwt_manager.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        ServerError::Unauthenticated
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { id: user_id });

    Ok(next.run(request).await)
}
