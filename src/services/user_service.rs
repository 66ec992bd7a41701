//! User service - Registration, authentication and profile management.
//!
//! Orchestrates the credential manager and the user repository via Unit of Work.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{CredentialManager, NewUser, Password, User, UserChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{NewUserRecord, UnitOfWork, UserUpdate};

/// Plaintext hashed once at startup; verified when a login names an unknown user.
const TIMING_DUMMY_PASSWORD: &str = "timing-equalizer-password";

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Validate, hash and persist a new user
    async fn register(&self, new_user: NewUser) -> AppResult<User>;

    /// Check a username/password pair.
    ///
    /// Unknown user and wrong password both yield `InvalidCredentials`.
    async fn login(&self, username: &str, password: &str) -> AppResult<User>;

    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Replace a user's profile; an empty password keeps the stored one
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;

    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    credentials: Arc<CredentialManager>,
    dummy_hash: Password,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>, credentials: Arc<CredentialManager>) -> Self {
        let dummy_hash = credentials
            .hash(TIMING_DUMMY_PASSWORD)
            .unwrap_or_else(|e| {
                tracing::warn!("Could not prepare dummy credential: {}", e);
                Password::from_hash(String::new())
            });

        Self {
            uow,
            credentials,
            dummy_hash,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn register(&self, new_user: NewUser) -> AppResult<User> {
        new_user.validate()?;

        let password_hash = self.credentials.hash(&new_user.password)?.into_string();
        let record = NewUserRecord {
            username: new_user.username,
            password_hash,
            full_name: new_user.full_name,
            email: new_user.email,
            role: new_user.role,
        };

        let user = self.uow.users().create(record).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::conflict("Username or email already exists"),
            other => other,
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    async fn login(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self.uow.users().find_by_username(username).await?;

        // Verify against a real hash even when the user is missing so both
        // failure paths cost the same.
        let verified = match &user {
            Some(user) => self
                .credentials
                .verify(password, &Password::from_hash(user.password_hash.clone())),
            None => {
                let _ = self.credentials.verify(password, &self.dummy_hash);
                false
            }
        };

        match user {
            Some(user) if verified => {
                tracing::debug!(user_id = %user.id, "Login succeeded");
                Ok(user)
            }
            _ => {
                tracing::debug!(%username, "Login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        changes.validate()?;

        let password_hash = match changes.new_password() {
            Some(plain) => Some(self.credentials.hash(plain)?.into_string()),
            None => None,
        };

        let update = UserUpdate {
            username: changes.username,
            full_name: changes.full_name,
            email: changes.email,
            role: changes.role,
            password_hash,
        };

        let user = self.uow.users().update(id, update).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::conflict("Username or email already exists"),
            other => other,
        })?;

        tracing::info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.uow.users().delete(id).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::conflict("User still has attendance records"),
            other => other,
        })?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
