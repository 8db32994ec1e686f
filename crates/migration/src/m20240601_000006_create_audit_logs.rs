//! Create `audit_logs` table.
//!
//! Append-only change history. Rows are written by database triggers outside
//! this service; `old_data`/`new_data` hold serialized row snapshots.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(pk_auto(AuditLogs::Id))
                    .col(string(AuditLogs::TableName).not_null())
                    .col(string(AuditLogs::RecordId).not_null())
                    .col(string(AuditLogs::Action).not_null())
                    .col(string_null(AuditLogs::OldData))
                    .col(string(AuditLogs::NewData).not_null())
                    .col(string_null(AuditLogs::UserId))
                    .col(timestamp_with_time_zone_null(AuditLogs::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AuditLogs::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AuditLogs { Table, Id, TableName, RecordId, Action, OldData, NewData, UserId, CreatedAt }
