//! Todo entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Maximum todo text length, in characters, after trimming.
pub const TODO_TEXT_MAX_CHARS: usize = 100;

/// Why a todo text was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TodoTextError {
    /// Nothing left after trimming.
    #[error("Please add a text value")]
    Empty,
    /// Longer than [`TODO_TEXT_MAX_CHARS`].
    #[error("Text cannot be more than {TODO_TEXT_MAX_CHARS} characters")]
    TooLong,
}

/// Trims a todo text and checks its length.
///
/// Returns the trimmed text, which is what gets stored.
pub fn validate_todo_text(text: &str) -> Result<String, TodoTextError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TodoTextError::Empty);
    }
    if trimmed.chars().count() > TODO_TEXT_MAX_CHARS {
        return Err(TodoTextError::TooLong);
    }
    Ok(trimmed.to_string())
}

/// A short text item owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier.
    pub id: Uuid,
    /// Trimmed text, 1 to 100 characters.
    pub text: String,
    /// Whether the item is done.
    pub completed: bool,
    /// Owning user. Set once at creation.
    pub owner: Uuid,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new, not yet completed todo for `owner`.
    pub fn new(owner: Uuid, text: &str) -> Result<Self, TodoTextError> {
        let text = validate_todo_text(text)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            text,
            completed: false,
            owner,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a patch in place. Owner and id are never touched.
    pub fn apply(&mut self, patch: &TodoPatch) -> Result<(), TodoTextError> {
        if let Some(text) = &patch.text {
            self.text = validate_todo_text(text)?;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Fields a client may change on an existing todo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    /// New text, validated like on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// New completion flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Sets the text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the completion flag.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Returns the validated text if the patch carries one.
    pub fn validated_text(&self) -> Result<Option<String>, TodoTextError> {
        self.text.as_deref().map(validate_todo_text).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_boundaries() {
        assert_eq!(validate_todo_text("a"), Ok("a".to_string()));
        assert!(validate_todo_text(&"x".repeat(100)).is_ok());
        assert_eq!(validate_todo_text(&"x".repeat(101)), Err(TodoTextError::TooLong));
        assert_eq!(validate_todo_text(""), Err(TodoTextError::Empty));
        assert_eq!(validate_todo_text(" \t\n "), Err(TodoTextError::Empty));
    }

    #[test]
    fn test_text_is_trimmed_before_counting() {
        let padded = format!("   {}   ", "x".repeat(100));
        assert_eq!(validate_todo_text(&padded), Ok("x".repeat(100)));
    }

    #[test]
    fn test_text_counts_characters_not_bytes() {
        assert!(validate_todo_text(&"é".repeat(100)).is_ok());
    }

    #[test]
    fn test_new_todo_defaults() {
        let owner = Uuid::new_v4();
        let todo = Todo::new(owner, "  buy milk ").unwrap();

        assert_eq!(todo.text, "buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.owner, owner);
    }

    #[test]
    fn test_apply_patch() {
        let owner = Uuid::new_v4();
        let mut todo = Todo::new(owner, "buy milk").unwrap();
        let id = todo.id;

        todo.apply(&TodoPatch::default().with_completed(true)).unwrap();
        assert!(todo.completed);
        assert_eq!(todo.text, "buy milk");

        todo.apply(&TodoPatch::default().with_text("buy oat milk")).unwrap();
        assert!(todo.completed);
        assert_eq!(todo.text, "buy oat milk");
        assert_eq!(todo.id, id);
        assert_eq!(todo.owner, owner);
    }

    #[test]
    fn test_apply_rejects_invalid_text_without_changes() {
        let mut todo = Todo::new(Uuid::new_v4(), "buy milk").unwrap();
        let before = todo.clone();

        let result = todo.apply(&TodoPatch::default().with_text("   ").with_completed(true));
        assert_eq!(result, Err(TodoTextError::Empty));
        assert_eq!(todo, before);
    }

    #[test]
    fn test_patch_ignores_unknown_fields() {
        let patch: TodoPatch =
            serde_json::from_str(r#"{"completed":true,"owner":"someone-else"}"#).unwrap();
        assert_eq!(patch, TodoPatch::default().with_completed(true));
    }

    #[test]
    fn test_todo_serializes_camel_case() {
        let todo = Todo::new(Uuid::new_v4(), "buy milk").unwrap();
        let json = serde_json::to_value(&todo).unwrap();

        assert_eq!(json["text"], "buy milk");
        assert_eq!(json["completed"], false);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
