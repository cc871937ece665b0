//! Ownership-checked todo operations.

use entities::{validate_todo_text, Todo, TodoPatch};
use todo_store::TodoStore;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};

/// Todo operations on behalf of an authenticated actor.
///
/// Every mutation confirms the todo exists, then that the actor owns it, and
/// only then writes. Owners never change, so the check stays valid until the
/// write; a concurrent delete surfaces as `NotFound` from the store.
pub struct TodoService<'a, S: TodoStore> {
    store: &'a S,
}

impl<'a, S: TodoStore> TodoService<'a, S> {
    /// Creates a todo service over a todo backend.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Lists the todos owned by `owner`.
    pub async fn list(&self, owner: Uuid) -> ServerResult<Vec<Todo>> {
        Ok(self.store.list_todos_by_owner(owner).await?)
    }

    /// Creates a todo owned by `owner`.
    pub async fn create(&self, owner: Uuid, text: &str) -> ServerResult<Todo> {
        let text = validate_todo_text(text)?;
        let todo = self.store.insert_todo(owner, &text).await?;

        tracing::info!(todo_id = %todo.id, owner = %owner, "Todo created");

        Ok(todo)
    }

    /// Applies `patch` to a todo the actor owns.
    pub async fn update(&self, actor: Uuid, todo_id: Uuid, patch: &TodoPatch) -> ServerResult<Todo> {
        self.owned_todo(actor, todo_id).await?;
        patch.validated_text()?;

        let todo = self.store.update_todo(todo_id, patch).await?;

        tracing::info!(todo_id = %todo_id, completed = todo.completed, "Todo updated");

        Ok(todo)
    }

    /// Deletes a todo the actor owns and returns its ID.
    pub async fn delete(&self, actor: Uuid, todo_id: Uuid) -> ServerResult<Uuid> {
        self.owned_todo(actor, todo_id).await?;
        self.store.delete_todo(todo_id).await?;

        tracing::info!(todo_id = %todo_id, "Todo deleted");

        Ok(todo_id)
    }

    async fn owned_todo(&self, actor: Uuid, todo_id: Uuid) -> ServerResult<Todo> {
        let todo = self
            .store
            .get_todo(todo_id)
            .await?
            .ok_or_else(|| ServerError::NotFound("Todo not found".to_string()))?;

        if todo.owner != actor {
            tracing::warn!(todo_id = %todo_id, actor = %actor, "Rejected access to another user's todo");
            return Err(ServerError::Forbidden);
        }

        Ok(todo)
    }
}
