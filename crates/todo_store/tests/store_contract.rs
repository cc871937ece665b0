//! Behavior every store backend must share.

use entities::{TodoPatch, User};
use todo_store::{MemoryStore, SqliteStore, Store, StoreError};
use uuid::Uuid;

async fn register(store: &impl Store, name: &str, email: &str) -> User {
    store
        .create_user(User::new(name, email, "$2b$04$not-a-real-hash"))
        .await
        .unwrap()
}

async fn users_are_unique_by_email(store: impl Store) {
    let alice = register(&store, "Alice", "alice@example.com").await;

    let by_email = store
        .get_user_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, alice.id);

    let by_id = store.get_user(alice.id).await.unwrap().unwrap();
    assert_eq!(by_id.name, "Alice");

    let duplicate = store
        .create_user(User::new("Mallory", "Alice@Example.com", "hash"))
        .await;
    assert!(matches!(duplicate, Err(StoreError::AlreadyExists { .. })));
}

async fn listing_is_scoped_and_ordered(store: impl Store) {
    let alice = register(&store, "Alice", "alice@example.com").await;
    let bob = register(&store, "Bob", "bob@example.com").await;

    store.insert_todo(alice.id, "one").await.unwrap();
    let bobs = store.insert_todo(bob.id, "bob's").await.unwrap();
    store.insert_todo(alice.id, "two").await.unwrap();
    store.insert_todo(alice.id, "three").await.unwrap();

    let alices: Vec<String> = store
        .list_todos_by_owner(alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.text)
        .collect();
    assert_eq!(alices, vec!["one", "two", "three"]);

    let bob_list = store.list_todos_by_owner(bob.id).await.unwrap();
    assert_eq!(bob_list.len(), 1);
    assert_eq!(bob_list[0].id, bobs.id);

    assert!(store
        .list_todos_by_owner(Uuid::new_v4())
        .await
        .unwrap()
        .is_empty());
}

async fn todo_lifecycle(store: impl Store) {
    let alice = register(&store, "Alice", "alice@example.com").await;

    let todo = store.insert_todo(alice.id, "  buy milk  ").await.unwrap();
    assert_eq!(todo.text, "buy milk");
    assert!(!todo.completed);
    assert_eq!(todo.owner, alice.id);

    let done = store
        .update_todo(todo.id, &TodoPatch::default().with_completed(true))
        .await
        .unwrap();
    assert!(done.completed);
    assert_eq!(done.text, "buy milk");
    assert!(done.updated_at >= todo.updated_at);

    let rejected = store
        .update_todo(todo.id, &TodoPatch::default().with_text(""))
        .await;
    assert!(matches!(rejected, Err(StoreError::Validation(_))));

    store.delete_todo(todo.id).await.unwrap();
    assert!(store.get_todo(todo.id).await.unwrap().is_none());

    let gone = store
        .update_todo(todo.id, &TodoPatch::default().with_completed(false))
        .await;
    assert!(matches!(gone, Err(StoreError::NotFound { .. })));
}

async fn insert_validates_text(store: impl Store) {
    let alice = register(&store, "Alice", "alice@example.com").await;

    assert!(store.insert_todo(alice.id, "x").await.is_ok());
    assert!(store.insert_todo(alice.id, &"x".repeat(100)).await.is_ok());
    assert!(matches!(
        store.insert_todo(alice.id, &"x".repeat(101)).await,
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.insert_todo(alice.id, "   ").await,
        Err(StoreError::Validation(_))
    ));
    assert_eq!(store.list_todos_by_owner(alice.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn memory_users_are_unique_by_email() {
    users_are_unique_by_email(MemoryStore::new()).await;
}

#[tokio::test]
async fn sqlite_users_are_unique_by_email() {
    users_are_unique_by_email(SqliteStore::in_memory().await.unwrap()).await;
}

#[tokio::test]
async fn memory_listing_is_scoped_and_ordered() {
    listing_is_scoped_and_ordered(MemoryStore::new()).await;
}

#[tokio::test]
async fn sqlite_listing_is_scoped_and_ordered() {
    listing_is_scoped_and_ordered(SqliteStore::in_memory().await.unwrap()).await;
}

#[tokio::test]
async fn memory_todo_lifecycle() {
    todo_lifecycle(MemoryStore::new()).await;
}

#[tokio::test]
async fn sqlite_todo_lifecycle() {
    todo_lifecycle(SqliteStore::in_memory().await.unwrap()).await;
}

#[tokio::test]
async fn memory_insert_validates_text() {
    insert_validates_text(MemoryStore::new()).await;
}

#[tokio::test]
async fn sqlite_insert_validates_text() {
    insert_validates_text(SqliteStore::in_memory().await.unwrap()).await;
}
