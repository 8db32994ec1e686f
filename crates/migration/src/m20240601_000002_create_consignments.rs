//! Create `consignments` table.
//!
//! Stock handed to an affiliate; rows are owned by `user_id`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Consignments::Table)
                    .if_not_exists()
                    .col(pk_auto(Consignments::Id))
                    .col(string(Consignments::UserId).not_null())
                    .col(string(Consignments::AffiliateId).not_null())
                    .col(integer(Consignments::InventoryId).not_null())
                    .col(integer(Consignments::Quantity).not_null())
                    .col(timestamp_with_time_zone_null(Consignments::ConsignedDate))
                    .col(timestamp_with_time_zone_null(Consignments::ReturnDate))
                    .col(string(Consignments::Status).not_null())
                    .col(string_null(Consignments::Notes))
                    .col(timestamp_with_time_zone_null(Consignments::CreatedAt))
                    .col(timestamp_with_time_zone_null(Consignments::UpdatedAt))
                    .col(timestamp_with_time_zone_null(Consignments::DeletedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Consignments::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Consignments {
    Table,
    Id,
    UserId,
    AffiliateId,
    InventoryId,
    Quantity,
    ConsignedDate,
    ReturnDate,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
