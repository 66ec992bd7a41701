//! User repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{User, UserRole};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Row to insert; the password is already hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserRecord {
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
}

/// Replacement values for an existing row.
///
/// `password_hash: None` leaves the stored hash untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct UserUpdate {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub password_hash: Option<String>,
}

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a new user. Duplicate username or email yields `Conflict`.
    async fn create(&self, record: NewUserRecord) -> AppResult<User>;

    /// Replace mutable fields of an existing user
    async fn update(&self, id: Uuid, changes: UserUpdate) -> AppResult<User>;

    /// Hard delete. Fails with `Conflict` while attendance rows still reference the user.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        result.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        result.map(User::try_from).transpose()
    }

    async fn create(&self, record: NewUserRecord) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(record.username),
            password_hash: Set(record.password_hash),
            full_name: Set(record.full_name),
            email: Set(record.email),
            role: Set(record.role.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self.db.as_ref()).await.map_err(AppError::from)?;
        User::try_from(model)
    }

    async fn update(&self, id: Uuid, changes: UserUpdate) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let mut active: ActiveModel = user.into();
        active.username = Set(changes.username);
        active.full_name = Set(changes.full_name);
        active.email = Set(changes.email);
        active.role = Set(changes.role.into());
        if let Some(hash) = changes.password_hash {
            active.password_hash = Set(hash);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.db.as_ref()).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => AppError::not_found("User not found"),
            other => AppError::from(other),
        })?;
        User::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("User not found"));
        }

        Ok(())
    }
}
