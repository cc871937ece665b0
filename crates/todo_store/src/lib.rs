//! User and todo storage for the todo server.
//!
//! This crate provides a storage abstraction for users and their todos with
//! an in-memory backend (default, and for tests) and a SQLite backend.
//! Stores persist records only; ownership is enforced by the caller.

mod error;
mod memory;
mod sqlite;
mod traits;

pub use error::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;
