//! Password hashing - value object plus the argon2 credential manager.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::{HashCost, MIN_PASSWORD_LENGTH};
use crate::errors::{AppError, AppResult};

/// Stored password credential (argon2 PHC string).
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

/// One-way password hashing with a fixed, configurable argon2id cost.
#[derive(Clone)]
pub struct CredentialManager {
    params: Params,
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialManager")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .finish()
    }
}

impl CredentialManager {
    /// Build a manager for the given cost.
    ///
    /// # Errors
    /// Returns an internal error if argon2 rejects the parameters.
    pub fn new(cost: HashCost) -> AppResult<Self> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| AppError::internal(format!("Invalid argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// Returns validation error if password is shorter than the minimum length.
    pub fn hash(&self, plain_text: &str) -> AppResult<Password> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;

        Ok(Password::from_hash(hash.to_string()))
    }

    /// Verify a plaintext password against a stored credential.
    ///
    /// A mismatch, or a stored value that is not a valid PHC string, is `false`.
    /// The cost embedded in the stored hash is used, so credentials hashed
    /// under an older cost keep verifying.
    pub fn verify(&self, plain_text: &str, stored: &Password) -> bool {
        match PasswordHash::new(stored.as_str()) {
            Ok(parsed) => self
                .argon2()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                false
            }
        }
    }

    #[inline]
    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for CredentialManager {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}
