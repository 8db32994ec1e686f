//! Create `issues` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Issues::Table)
                    .if_not_exists()
                    .col(pk_auto(Issues::Id))
                    .col(string(Issues::UserId).not_null())
                    .col(string(Issues::AffiliateId).not_null())
                    .col(integer(Issues::InventoryId).not_null())
                    .col(string(Issues::IssueType).not_null())
                    .col(string(Issues::Description).not_null())
                    .col(string_null(Issues::PhotoUrl))
                    .col(string(Issues::Status).not_null())
                    .col(timestamp_with_time_zone_null(Issues::CreatedAt))
                    .col(timestamp_with_time_zone_null(Issues::UpdatedAt))
                    .col(timestamp_with_time_zone_null(Issues::DeletedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Issues::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Issues {
    Table,
    Id,
    UserId,
    AffiliateId,
    InventoryId,
    IssueType,
    Description,
    PhotoUrl,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
