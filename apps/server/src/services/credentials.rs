//! Credential store: user records plus password hashing.

use auth::PasswordHasher;
use entities::{normalize_email, User};
use todo_store::UserStore;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};

/// Persists users and checks their passwords. Raw passwords never reach the
/// backing store.
pub struct CredentialStore<'a, S: UserStore> {
    store: &'a S,
    hasher: PasswordHasher,
}

impl<'a, S: UserStore> CredentialStore<'a, S> {
    /// Creates a credential store over a user backend.
    pub fn new(store: &'a S, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Looks a user up by email, normalizing it first.
    pub async fn find_by_email(&self, email: &str) -> ServerResult<Option<User>> {
        Ok(self.store.get_user_by_email(&normalize_email(email)).await?)
    }

    /// Looks a user up by ID.
    pub async fn find_by_id(&self, id: Uuid) -> ServerResult<Option<User>> {
        Ok(self.store.get_user(id).await?)
    }

    /// Hashes the password and creates the user.
    ///
    /// Fails with `DuplicateEmail` if the email is already registered.
    pub async fn create(&self, name: &str, email: &str, raw_password: &str) -> ServerResult<User> {
        let hasher = self.hasher;
        let password = raw_password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServerError::Infrastructure(format!("Password hashing task failed: {e}")))??;

        let user = User::new(name, email, password_hash);
        Ok(self.store.create_user(user).await?)
    }

    /// Checks a raw password against the user's stored hash.
    pub async fn verify_password(&self, user: &User, raw_password: &str) -> ServerResult<bool> {
        let hasher = self.hasher;
        let password = raw_password.to_string();
        let hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                ServerError::Infrastructure(format!("Password verification task failed: {e}"))
            })??;
        Ok(valid)
    }

    /// Spends one bcrypt round on a password for an email with no account.
    /// Always reports a mismatch.
    pub async fn verify_unknown_user_password(&self, raw_password: &str) -> ServerResult<bool> {
        let hasher = self.hasher;
        let password = raw_password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                ServerError::Infrastructure(format!("Password verification task failed: {e}"))
            })??;
        Ok(false)
    }
}
