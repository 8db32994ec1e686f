//! Create `inventory` table.
//!
//! Warehouse stock items; not owned by any caller.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Inventory::Table)
                    .if_not_exists()
                    .col(pk_auto(Inventory::Id))
                    .col(string(Inventory::Sku).not_null())
                    .col(string(Inventory::ProductName).not_null())
                    .col(string_null(Inventory::Description))
                    .col(string_null(Inventory::Category))
                    .col(double(Inventory::UnitCost).not_null())
                    .col(double(Inventory::RetailPrice).not_null())
                    .col(string(Inventory::Status).not_null())
                    .col(string_null(Inventory::Location))
                    .col(string_null(Inventory::Barcode))
                    .col(timestamp_with_time_zone_null(Inventory::CreatedAt))
                    .col(timestamp_with_time_zone_null(Inventory::UpdatedAt))
                    .col(timestamp_with_time_zone_null(Inventory::DeletedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Inventory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Inventory {
    Table,
    Id,
    Sku,
    ProductName,
    Description,
    Category,
    UnitCost,
    RetailPrice,
    Status,
    Location,
    Barcode,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
