//! Registration and login.

use auth::{JwtManager, MAX_PASSWORD_BYTES};
use entities::{normalize_email, User};
use todo_store::UserStore;

use crate::error::{ServerError, ServerResult};
use crate::services::CredentialStore;

/// A user together with a freshly issued access token.
#[derive(Debug, Clone)]
pub struct Session {
    /// The authenticated user.
    pub user: User,
    /// Signed access token for the user.
    pub token: String,
}

/// Verifies credentials and mints access tokens.
pub struct Authenticator<'a, S: UserStore> {
    credentials: CredentialStore<'a, S>,
    tokens: &'a JwtManager,
}

impl<'a, S: UserStore> Authenticator<'a, S> {
    /// Creates an authenticator.
    pub fn new(credentials: CredentialStore<'a, S>, tokens: &'a JwtManager) -> Self {
        Self {
            credentials,
            tokens,
        }
    }

    /// Registers a new user and issues a token.
    pub async fn register(&self, name: &str, email: &str, raw_password: &str) -> ServerResult<Session> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServerError::Validation("Please add a name".to_string()));
        }
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(ServerError::Validation("Please add a valid email".to_string()));
        }
        if raw_password.is_empty() {
            return Err(ServerError::Validation("Please add a password".to_string()));
        }
        if raw_password.len() > MAX_PASSWORD_BYTES {
            return Err(ServerError::Validation(format!(
                "Password cannot be longer than {MAX_PASSWORD_BYTES} bytes"
            )));
        }

        if self.credentials.find_by_email(&email).await?.is_some() {
            return Err(ServerError::DuplicateEmail);
        }

        let user = self.credentials.create(name, &email, raw_password).await?;
        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(Session { user, token })
    }

    /// Checks an email and password and issues a token.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, raw_password: &str) -> ServerResult<Session> {
        // bcrypt compares only the first MAX_PASSWORD_BYTES; longer input never matches.
        if email.trim().is_empty()
            || raw_password.is_empty()
            || raw_password.len() > MAX_PASSWORD_BYTES
        {
            return Err(ServerError::InvalidCredentials);
        }

        let Some(user) = self.credentials.find_by_email(email).await? else {
            // Same bcrypt cost as a real check; timing must not reveal registered emails.
            self.credentials.verify_unknown_user_password(raw_password).await?;
            tracing::debug!("Login failed: unknown email");
            return Err(ServerError::InvalidCredentials);
        };

        if !self.credentials.verify_password(&user, raw_password).await? {
            tracing::debug!(user_id = %user.id, "Login failed: wrong password");
            return Err(ServerError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(Session { user, token })
    }
}

/// Accepts `local@domain.tld`-shaped addresses without whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
