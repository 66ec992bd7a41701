//! Migration: Create attendances table.
//!
//! One row per user per calendar day, enforced by a unique index on
//! `(user_id, attendance_date)`.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendances::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendances::UserId).uuid().not_null())
                    .col(ColumnDef::new(Attendances::AttendanceDate).date().not_null())
                    .col(
                        ColumnDef::new(Attendances::CheckIn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attendances::CheckOut)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Attendances::LocationIn).string_len(255).null())
                    .col(ColumnDef::new(Attendances::LocationOut).string_len(255).null())
                    .col(ColumnDef::new(Attendances::Notes).text().null())
                    .col(
                        ColumnDef::new(Attendances::Status)
                            .string_len(20)
                            .not_null()
                            .default("present")
                            .check(
                                Expr::col(Attendances::Status)
                                    .is_in(["present", "late", "absent", "leave"]),
                            ),
                    )
                    .col(
                        ColumnDef::new(Attendances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Attendances::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(
                        Expr::col(Attendances::CheckOut)
                            .is_null()
                            .or(Expr::col(Attendances::CheckOut).gt(Expr::col(Attendances::CheckIn))),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendances_user_id")
                            .from(Attendances::Table, Attendances::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendances_user_date")
                    .table(Attendances::Table)
                    .col(Attendances::UserId)
                    .col(Attendances::AttendanceDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // History queries scan by user and check-in time
        manager
            .create_index(
                Index::create()
                    .name("idx_attendances_user_check_in")
                    .table(Attendances::Table)
                    .col(Attendances::UserId)
                    .col(Attendances::CheckIn)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Attendances {
    Table,
    Id,
    UserId,
    AttendanceDate,
    CheckIn,
    CheckOut,
    LocationIn,
    LocationOut,
    Notes,
    Status,
    CreatedAt,
    UpdatedAt,
}
