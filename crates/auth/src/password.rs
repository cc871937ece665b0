//! Salted one-way password hashing.

use crate::{AuthError, AuthResult};

/// Longest password bcrypt can hash without truncating it.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hashes and verifies passwords with bcrypt.
///
/// Both operations are CPU bound; async callers should run them on a
/// blocking thread.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    /// Creates a hasher with the given bcrypt cost (4 to 31).
    pub fn new(cost: u32) -> AuthResult<Self> {
        if !(4..=31).contains(&cost) {
            return Err(AuthError::Configuration(format!(
                "bcrypt cost must be between 4 and 31, got {cost}"
            )));
        }
        Ok(Self { cost })
    }

    /// Returns the configured cost.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes a raw password with a fresh random salt.
    ///
    /// Passwords longer than [`MAX_PASSWORD_BYTES`] are refused rather than
    /// truncated.
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::PasswordHash(format!(
                "password exceeds {MAX_PASSWORD_BYTES} bytes"
            )));
        }
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Checks a raw password against a stored hash.
    ///
    /// A password longer than [`MAX_PASSWORD_BYTES`] never matches, so a
    /// suffix appended to a valid password cannot slip past bcrypt's
    /// truncation.
    pub fn verify(&self, password: &str, hash: &str) -> AuthResult<bool> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        Ok(bcrypt::verify(password, hash)?)
    }
}
