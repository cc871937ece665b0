//! Todo endpoints. All of them run behind the authentication middleware.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use entities::{Todo, TodoPatch};
use serde::{Deserialize, Serialize};
use todo_store::Store;
use uuid::Uuid;

use crate::api::json_body;
use crate::error::{ServerError, ServerResult};
use crate::middleware::AuthenticatedUser;
use crate::state::SharedState;

/// Create request body. Any other field, `owner` included, is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub text: String,
}

/// Update request body. Only these fields can ever be changed.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl From<UpdateTodoRequest> for TodoPatch {
    fn from(request: UpdateTodoRequest) -> Self {
        Self {
            text: request.text,
            completed: request.completed,
        }
    }
}

/// Delete response body.
#[derive(Debug, Serialize)]
pub struct DeleteTodoResponse {
    pub id: Uuid,
}

/// Parses a todo ID from the path. Anything that is not a UUID cannot name a
/// todo, so it is reported as not found.
fn parse_todo_id(raw: &str) -> ServerResult<Uuid> {
    raw.parse()
        .map_err(|_| ServerError::NotFound("Todo not found".to_string()))
}

/// Lists the caller's todos.
pub async fn list_todos<S: Store + 'static>(
    State(state): State<SharedState<S>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<Vec<Todo>>> {
    let todos = state.todos().list(user.id).await?;
    Ok(Json(todos))
}

/// Creates a todo owned by the caller.
pub async fn create_todo<S: Store + 'static>(
    State(state): State<SharedState<S>>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Todo>)> {
    let request = json_body(payload)?;

    let todo = state.todos().create(user.id, &request.text).await?;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// Updates one of the caller's todos.
pub async fn update_todo<S: Store + 'static>(
    State(state): State<SharedState<S>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ServerResult<Json<Todo>> {
    let todo_id = parse_todo_id(&id)?;
    let patch: TodoPatch = json_body(payload)?.into();

    let todo = state.todos().update(user.id, todo_id, &patch).await?;

    Ok(Json(todo))
}

/// Deletes one of the caller's todos.
pub async fn delete_todo<S: Store + 'static>(
    State(state): State<SharedState<S>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ServerResult<Json<DeleteTodoResponse>> {
    let todo_id = parse_todo_id(&id)?;

    let id = state.todos().delete(user.id, todo_id).await?;

    Ok(Json(DeleteTodoResponse { id }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_ignores_owner() {
        let request: UpdateTodoRequest = serde_json::from_str(
            r#"{"text":"new","owner":"00000000-0000-0000-0000-000000000000","id":"x"}"#,
        )
        .unwrap();
        let patch: TodoPatch = request.into();

        assert_eq!(patch, TodoPatch::default().with_text("new"));
    }

    #[test]
    fn test_parse_todo_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_todo_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_todo_id("not-a-uuid"),
            Err(ServerError::NotFound(_))
        ));
    }
}
