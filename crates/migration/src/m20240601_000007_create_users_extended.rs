//! Create `users_extended` table.
//!
//! Profile and role data keyed by the auth user id (an email for admin-created users).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UsersExtended::Table)
                    .if_not_exists()
                    .col(string(UsersExtended::Id).primary_key())
                    .col(string(UsersExtended::Role).not_null())
                    .col(string(UsersExtended::Status).not_null())
                    .col(string(UsersExtended::FullName).not_null())
                    .col(string_null(UsersExtended::Phone))
                    .col(timestamp_with_time_zone_null(UsersExtended::CreatedAt))
                    .col(timestamp_with_time_zone_null(UsersExtended::DeletedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UsersExtended::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UsersExtended { Table, Id, Role, Status, FullName, Phone, CreatedAt, DeletedAt }
