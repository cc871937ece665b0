//! SQLite store implementation.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{Todo, TodoPatch, User};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use uuid::Uuid;

use crate::{StoreError, StoreResult, TodoStore, UserStore};

type UserRow = (String, String, String, String, DateTime<Utc>, DateTime<Utc>);
type TodoRow = (String, String, bool, String, DateTime<Utc>, DateTime<Utc>);

/// SQLite-backed store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Creates a store over an existing pool. Call [`SqliteStore::init`] before use.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Connects to `database_url`, creating the file if needed, and
    /// initializes the schema.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let store = Self::new(pool);
        store.init().await?;
        Ok(store)
    }

    /// Opens a private in-memory database with the schema initialized.
    ///
    /// The pool is pinned to a single connection that never expires, since
    /// every SQLite in-memory connection is its own database.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.init().await?;
        Ok(store)
    }

    /// Initializes the database tables.
    pub async fn init(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT 0,
                owner_id TEXT NOT NULL REFERENCES users (id),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Owner listing
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_todos_owner_id
            ON todos (owner_id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::debug!("SQLite schema initialized");
        Ok(())
    }
}

fn parse_id(raw: &str) -> StoreResult<Uuid> {
    raw.parse()
        .map_err(|_| StoreError::Other(format!("Corrupt id in database: {raw}")))
}

fn user_from_row(row: UserRow) -> StoreResult<User> {
    let (id, name, email, password_hash, created_at, updated_at) = row;
    Ok(User {
        id: parse_id(&id)?,
        name,
        email,
        password_hash,
        created_at,
        updated_at,
    })
}

fn todo_from_row(row: TodoRow) -> StoreResult<Todo> {
    let (id, text, completed, owner_id, created_at, updated_at) = row;
    Ok(Todo {
        id: parse_id(&id)?,
        text,
        completed,
        owner: parse_id(&owner_id)?,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn create_user(&self, user: User) -> StoreResult<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::already_exists("User", user.email))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn insert_todo(&self, owner: Uuid, text: &str) -> StoreResult<Todo> {
        let todo = Todo::new(owner, text)?;

        let result = sqlx::query(
            r#"
            INSERT INTO todos (id, text, completed, owner_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(todo.id.to_string())
        .bind(&todo.text)
        .bind(todo.completed)
        .bind(todo.owner.to_string())
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(todo),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(StoreError::not_found("User", owner.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_todo(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        let row: Option<TodoRow> = sqlx::query_as(
            r#"
            SELECT id, text, completed, owner_id, created_at, updated_at
            FROM todos
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(todo_from_row).transpose()
    }

    async fn list_todos_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Todo>> {
        let rows: Vec<TodoRow> = sqlx::query_as(
            r#"
            SELECT id, text, completed, owner_id, created_at, updated_at
            FROM todos
            WHERE owner_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(owner.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(todo_from_row).collect()
    }

    async fn update_todo(&self, id: Uuid, patch: &TodoPatch) -> StoreResult<Todo> {
        let text = patch.validated_text()?;

        // Update and read back in one transaction.
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE todos
            SET text = COALESCE(?, text),
                completed = COALESCE(?, completed),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(text)
        .bind(patch.completed)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Todo", id.to_string()));
        }

        let row: Option<TodoRow> = sqlx::query_as(
            r#"
            SELECT id, text, completed, owner_id, created_at, updated_at
            FROM todos
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        row.map(todo_from_row)
            .transpose()?
            .ok_or_else(|| StoreError::not_found("Todo", id.to_string()))
    }

    async fn delete_todo(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM todos
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Todo", id.to_string()));
        }
        Ok(())
    }
}
