//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{User, UserRole};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub role: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role: UserRole = model
            .role
            .parse()
            .map_err(|_| AppError::internal(format!("Stored role '{}' is invalid", model.role)))?;

        Ok(User {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            full_name: model.full_name,
            email: model.email,
            role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
