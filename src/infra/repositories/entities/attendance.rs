//! Attendance database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{Attendance, AttendanceStatus};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// Unique together with `user_id`
    pub attendance_date: Date,
    pub check_in: DateTimeUtc,
    pub check_out: Option<DateTimeUtc>,
    pub location_in: Option<String>,
    pub location_out: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Attendance {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status: AttendanceStatus = model.status.parse().map_err(|_| {
            AppError::internal(format!("Stored attendance status '{}' is invalid", model.status))
        })?;

        Ok(Attendance {
            id: model.id,
            user_id: model.user_id,
            attendance_date: model.attendance_date,
            check_in: model.check_in,
            check_out: model.check_out,
            location_in: model.location_in,
            location_out: model.location_out,
            notes: model.notes,
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Every column set, for inserts.
impl From<Attendance> for ActiveModel {
    fn from(attendance: Attendance) -> Self {
        ActiveModel {
            id: Set(attendance.id),
            user_id: Set(attendance.user_id),
            attendance_date: Set(attendance.attendance_date),
            check_in: Set(attendance.check_in),
            check_out: Set(attendance.check_out),
            location_in: Set(attendance.location_in),
            location_out: Set(attendance.location_out),
            notes: Set(attendance.notes),
            status: Set(attendance.status.as_str().to_string()),
            created_at: Set(attendance.created_at),
            updated_at: Set(attendance.updated_at),
        }
    }
}
