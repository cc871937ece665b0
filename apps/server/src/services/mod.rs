//! Business services behind the HTTP handlers.

mod authenticator;
mod credentials;
mod todos;

pub use authenticator::*;
pub use credentials::*;
pub use todos::*;
