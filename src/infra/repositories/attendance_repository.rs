//! Attendance repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, SqlErr,
};
use uuid::Uuid;

use super::entities::attendance::{self, ActiveModel, Entity as AttendanceEntity};
use crate::domain::{Attendance, TimeRange};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Attendance repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Insert a record.
    ///
    /// A second record for the same user and day yields `Conflict`; an unknown
    /// user yields `NotFound`. No other failure maps to `Conflict`.
    async fn create(&self, attendance: Attendance) -> AppResult<Attendance>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Attendance>>;

    /// The user's record for one calendar day, if any
    async fn find_by_user_and_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<Attendance>>;

    /// Persist every mutable field of an existing record
    async fn update(&self, attendance: Attendance) -> AppResult<Attendance>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Records whose check-in falls in `[range.start, range.end)`, oldest first
    async fn list_for_user_in_range(
        &self,
        user_id: Uuid,
        range: TimeRange,
    ) -> AppResult<Vec<Attendance>>;
}

/// SeaORM-backed attendance repository
pub struct AttendanceStore {
    db: Arc<DatabaseConnection>,
}

impl AttendanceStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AttendanceRepository for AttendanceStore {
    async fn create(&self, attendance: Attendance) -> AppResult<Attendance> {
        let active_model: ActiveModel = attendance.into();
        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    AppError::not_found("User not found")
                }
                _ => AppError::from(e),
            })?;
        Attendance::try_from(model)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Attendance>> {
        let result = AttendanceEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        result.map(Attendance::try_from).transpose()
    }

    async fn find_by_user_and_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<Attendance>> {
        let result = AttendanceEntity::find()
            .filter(attendance::Column::UserId.eq(user_id))
            .filter(attendance::Column::AttendanceDate.eq(date))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        result.map(Attendance::try_from).transpose()
    }

    async fn update(&self, attendance: Attendance) -> AppResult<Attendance> {
        let active_model: ActiveModel = attendance.into();
        let model = active_model.update(self.db.as_ref()).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => AppError::not_found("Attendance not found"),
            other => AppError::from(other),
        })?;
        Attendance::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = AttendanceEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Attendance not found"));
        }

        Ok(())
    }

    async fn list_for_user_in_range(
        &self,
        user_id: Uuid,
        range: TimeRange,
    ) -> AppResult<Vec<Attendance>> {
        let models = AttendanceEntity::find()
            .filter(attendance::Column::UserId.eq(user_id))
            .filter(attendance::Column::CheckIn.gte(range.start))
            .filter(attendance::Column::CheckIn.lt(range.end))
            .order_by_asc(attendance::Column::CheckIn)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(Attendance::try_from).collect()
    }
}
