//! Create `deliveries` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Deliveries::Table)
                    .if_not_exists()
                    .col(pk_auto(Deliveries::Id))
                    .col(string(Deliveries::UserId).not_null())
                    .col(string(Deliveries::DriverId).not_null())
                    .col(integer(Deliveries::ConsignmentId).not_null())
                    .col(string(Deliveries::DeliveryAddress).not_null())
                    .col(timestamp_with_time_zone_null(Deliveries::ScheduledDate))
                    .col(timestamp_with_time_zone_null(Deliveries::CompletedDate))
                    .col(string(Deliveries::Status).not_null())
                    .col(integer(Deliveries::RoutePriority).not_null())
                    .col(string_null(Deliveries::SignatureUrl))
                    .col(string_null(Deliveries::PhotoUrl))
                    .col(string_null(Deliveries::Notes))
                    .col(timestamp_with_time_zone_null(Deliveries::CreatedAt))
                    .col(timestamp_with_time_zone_null(Deliveries::UpdatedAt))
                    .col(timestamp_with_time_zone_null(Deliveries::DeletedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Deliveries::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Deliveries {
    Table,
    Id,
    UserId,
    DriverId,
    ConsignmentId,
    DeliveryAddress,
    ScheduledDate,
    CompletedDate,
    Status,
    RoutePriority,
    SignatureUrl,
    PhotoUrl,
    Notes,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
