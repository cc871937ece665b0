//! In-memory store implementation.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use entities::{Todo, TodoPatch, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{StoreError, StoreResult, TodoStore, UserStore};

/// In-memory store, used when no database is configured and in tests.
///
/// Each operation holds the collection lock for its whole read-modify-write.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    // Vec keeps insertion order for listing.
    todos: Arc<RwLock<Vec<Todo>>>,
}

impl MemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(StoreError::already_exists("User", user.id.to_string()));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::already_exists("User", user.email));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert_todo(&self, owner: Uuid, text: &str) -> StoreResult<Todo> {
        let todo = Todo::new(owner, text)?;
        let mut todos = self.todos.write().await;
        todos.push(todo.clone());
        Ok(todo)
    }

    async fn get_todo(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|t| t.id == id).cloned())
    }

    async fn list_todos_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos.iter().filter(|t| t.owner == owner).cloned().collect())
    }

    async fn update_todo(&self, id: Uuid, patch: &TodoPatch) -> StoreResult<Todo> {
        let mut todos = self.todos.write().await;
        let todo = todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found("Todo", id.to_string()))?;
        todo.apply(patch)?;
        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: Uuid) -> StoreResult<()> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| t.id != id);
        if todos.len() == before {
            return Err(StoreError::not_found("Todo", id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use entities::TodoTextError;

    use super::*;

    #[tokio::test]
    async fn test_user_crud() {
        let store = MemoryStore::new();

        let user = User::new("Alice", "a@x.com", "hash");
        let created = store.create_user(user.clone()).await.unwrap();
        assert_eq!(created.name, "Alice");

        let fetched = store.get_user(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "a@x.com");

        let by_email = store.get_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        assert!(store.get_user_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let store = MemoryStore::new();
        store
            .create_user(User::new("Alice", "a@x.com", "hash"))
            .await
            .unwrap();

        let result = store.create_user(User::new("Other", "A@X.com", "hash")).await;
        assert!(matches!(result, Err(StoreError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_todo_crud() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        // Create
        let created = store.insert_todo(owner, "buy milk").await.unwrap();
        assert_eq!(created.text, "buy milk");
        assert!(!created.completed);

        // Update
        let updated = store
            .update_todo(created.id, &TodoPatch::default().with_completed(true))
            .await
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.owner, owner);

        // Get
        let fetched = store.get_todo(created.id).await.unwrap().unwrap();
        assert!(fetched.completed);

        // Delete
        store.delete_todo(created.id).await.unwrap();
        assert!(store.get_todo(created.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_todo(created.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_by_owner_in_insertion_order() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.insert_todo(alice, "first").await.unwrap();
        store.insert_todo(bob, "bob's").await.unwrap();
        store.insert_todo(alice, "second").await.unwrap();
        store.insert_todo(alice, "third").await.unwrap();

        let texts: Vec<String> = store
            .list_todos_by_owner(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_update_revalidates_text() {
        let store = MemoryStore::new();
        let todo = store.insert_todo(Uuid::new_v4(), "buy milk").await.unwrap();

        let result = store
            .update_todo(todo.id, &TodoPatch::default().with_text("x".repeat(101)))
            .await;
        assert!(matches!(
            result,
            Err(StoreError::Validation(TodoTextError::TooLong))
        ));

        let unchanged = store.get_todo(todo.id).await.unwrap().unwrap();
        assert_eq!(unchanged.text, "buy milk");
    }

    #[tokio::test]
    async fn test_update_missing_todo() {
        let store = MemoryStore::new();
        let result = store
            .update_todo(Uuid::new_v4(), &TodoPatch::default().with_completed(true))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }
}
