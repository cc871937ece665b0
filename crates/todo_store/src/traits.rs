//! Store trait definitions.

use async_trait::async_trait;
use entities::{Todo, TodoPatch, User};
use uuid::Uuid;

use crate::StoreResult;

/// Persistence for user identity records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a new user. Fails with `AlreadyExists` if the email is taken.
    async fn create_user(&self, user: User) -> StoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Gets a user by normalized email.
    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Persistence for todo records. Performs no ownership checks.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Creates a todo owned by `owner`, validating the text.
    async fn insert_todo(&self, owner: Uuid, text: &str) -> StoreResult<Todo>;

    /// Gets a todo by ID.
    async fn get_todo(&self, id: Uuid) -> StoreResult<Option<Todo>>;

    /// Lists the todos owned by `owner`, in insertion order.
    async fn list_todos_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Todo>>;

    /// Applies the provided patch fields to a todo as one atomic write.
    async fn update_todo(&self, id: Uuid, patch: &TodoPatch) -> StoreResult<Todo>;

    /// Deletes a todo.
    async fn delete_todo(&self, id: Uuid) -> StoreResult<()>;
}

/// A backend holding both users and todos.
pub trait Store: UserStore + TodoStore {}

impl<T: UserStore + TodoStore> Store for T {}
