//! JWT token generation and validation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AuthError, AuthResult, DEFAULT_JWT_EXPIRATION_DAYS, DEFAULT_JWT_ISSUER, MAX_JWT_EXPIRATION_DAYS,
};

/// Authorization scheme prefix expected in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// JWT claims for todo server access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// JWT ID.
    pub jti: String,
}

impl Claims {
    /// Creates claims for a user, issued at `now`.
    pub fn new(
        user_id: Uuid,
        now: DateTime<Utc>,
        lifetime: Duration,
        issuer: &str,
    ) -> AuthResult<Self> {
        let exp = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| AuthError::Configuration("token expiry is out of range".to_string()))?;

        Ok(Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Returns the user ID.
    pub fn user_id(&self) -> AuthResult<Uuid> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }

    /// Returns true if the token is expired at `now`.
    ///
    /// A token is still valid during the second named by `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }
}

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token expiration in days.
    pub expiration_days: u64,
    /// Token issuer.
    pub issuer: String,
}

impl JwtConfig {
    /// Creates a new JWT configuration.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_days: DEFAULT_JWT_EXPIRATION_DAYS,
            issuer: DEFAULT_JWT_ISSUER.to_string(),
        }
    }

    /// Sets the expiration time in days.
    pub fn with_expiration_days(mut self, days: u64) -> Self {
        self.expiration_days = days;
        self
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Returns the token lifetime, rejecting values outside
    /// `1..=MAX_JWT_EXPIRATION_DAYS`.
    pub fn lifetime(&self) -> AuthResult<Duration> {
        let out_of_range = || {
            AuthError::Configuration(format!(
                "JWT expiration must be between 1 and {MAX_JWT_EXPIRATION_DAYS} days, got {}",
                self.expiration_days
            ))
        };
        if !(1..=MAX_JWT_EXPIRATION_DAYS).contains(&self.expiration_days) {
            return Err(out_of_range());
        }
        i64::try_from(self.expiration_days)
            .ok()
            .and_then(Duration::try_days)
            .ok_or_else(out_of_range)
    }
}

/// Issues and verifies signed, time-limited access tokens.
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("expiration_days", &self.config.expiration_days)
            .field("issuer", &self.config.issuer)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    /// Creates a new JWT manager.
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issues an access token for a user.
    pub fn issue(&self, user_id: Uuid) -> AuthResult<String> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues an access token as if the current time were `now`.
    pub fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> AuthResult<String> {
        let claims = Claims::new(user_id, now, self.config.lifetime()?, &self.config.issuer)?;

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::JwtEncoding(e.to_string()))
    }

    /// Verifies a token and returns the user ID it was issued for.
    pub fn verify(&self, token: &str) -> AuthResult<Uuid> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Uuid> {
        let claims = self.decode_claims(token)?;
        if claims.is_expired_at(now) {
            return Err(AuthError::TokenExpired);
        }
        claims.user_id()
    }

    /// Checks signature, algorithm and issuer. Expiry is checked by the caller
    /// against its own clock.
    fn decode_claims(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    /// Returns the token lifetime in seconds.
    pub fn expiration_seconds(&self) -> u64 {
        self.config.expiration_days.saturating_mul(24 * 3600)
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// Only the exact `Bearer <token>` shape is accepted.
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix(BEARER_PREFIX)?;
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}
