//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::config::{ROLE_ADMIN, ROLE_EMPLOYEE};
use crate::errors::AppError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Employee,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Employee => ROLE_EMPLOYEE,
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(UserRole::Admin),
            ROLE_EMPLOYEE => Ok(UserRole::Employee),
            other => Err(AppError::validation(format!("Unknown role: {}", other))),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration input; `password` is plaintext until the directory hashes it.
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: String,
    pub role: UserRole,
}

/// Full replacement of a user's mutable fields.
///
/// `password: None` (or an empty string) keeps the stored credential.
#[derive(Debug, Clone, Validate)]
pub struct UserChanges {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: String,
    pub role: UserRole,
    pub password: Option<String>,
}

impl UserChanges {
    /// New plaintext password, if one was actually supplied.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
