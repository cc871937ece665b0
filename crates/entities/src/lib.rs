//! Core entity definitions for the todo server.
//!
//! This crate defines the records shared by the store, the auth layer and the
//! HTTP server: users, todos, and the patch applied to a todo on update.

mod todo;
mod user;

pub use todo::*;
pub use user::*;
