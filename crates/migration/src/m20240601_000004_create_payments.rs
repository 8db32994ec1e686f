//! Create `payments` table.
//!
//! `consignment_id` is optional: not every payment settles a consignment.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(pk_auto(Payments::Id))
                    .col(string(Payments::UserId).not_null())
                    .col(string(Payments::AffiliateId).not_null())
                    .col(integer_null(Payments::ConsignmentId))
                    .col(double(Payments::Amount).not_null())
                    .col(string(Payments::PaymentType).not_null())
                    .col(timestamp_with_time_zone_null(Payments::PaymentDate))
                    .col(string(Payments::Status).not_null())
                    .col(string_null(Payments::Notes))
                    .col(timestamp_with_time_zone_null(Payments::CreatedAt))
                    .col(timestamp_with_time_zone_null(Payments::UpdatedAt))
                    .col(timestamp_with_time_zone_null(Payments::DeletedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Payments::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    UserId,
    AffiliateId,
    ConsignmentId,
    Amount,
    PaymentType,
    PaymentDate,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
