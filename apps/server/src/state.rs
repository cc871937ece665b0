//! Application state.

use std::sync::Arc;

use auth::{JwtManager, PasswordHasher};
use todo_store::Store;

use crate::config::Config;
use crate::services::{Authenticator, CredentialStore, TodoService};

/// Shared application state. Built once at startup, read-only afterwards
/// apart from the store.
pub struct AppState<S: Store> {
    /// Server configuration.
    pub config: Config,
    /// User and todo store.
    pub store: S,
    /// Access token issuer and verifier.
    pub jwt_manager: JwtManager,
    /// Password hasher.
    pub password_hasher: PasswordHasher,
}

impl<S: Store> AppState<S> {
    /// Creates new application state.
    pub fn new(
        config: Config,
        store: S,
        jwt_manager: JwtManager,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            config,
            store,
            jwt_manager,
            password_hasher,
        }
    }

    /// Returns the credential store.
    pub fn credentials(&self) -> CredentialStore<'_, S> {
        CredentialStore::new(&self.store, self.password_hasher)
    }

    /// Returns the authenticator.
    pub fn authenticator(&self) -> Authenticator<'_, S> {
        Authenticator::new(self.credentials(), &self.jwt_manager)
    }

    /// Returns the todo service.
    pub fn todos(&self) -> TodoService<'_, S> {
        TodoService::new(&self.store)
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from its parts.
pub fn create_shared_state<S: Store>(
    config: Config,
    store: S,
    jwt_manager: JwtManager,
    password_hasher: PasswordHasher,
) -> SharedState<S> {
    Arc::new(AppState::new(config, store, jwt_manager, password_hasher))
}
