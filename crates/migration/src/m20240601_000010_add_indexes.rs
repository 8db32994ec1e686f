use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const OWNER_INDEXES: [(&str, &str); 4] = [
    ("idx_consignments_user", "consignments"),
    ("idx_deliveries_user", "deliveries"),
    ("idx_payments_user", "payments"),
    ("idx_issues_user", "issues"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Owner-scoped tables: every scoped query filters on user_id
        for (name, table) in OWNER_INDEXES {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Alias::new(table))
                        .col(Owned::UserId)
                        .to_owned(),
                )
                .await?;
        }

        // AuditLogs: viewer filters by table and pages newest first
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_logs_table")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::TableName)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_logs_created")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Inventory: analytics counts by status
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inventory_status")
                    .table(Inventory::Table)
                    .col(Inventory::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in OWNER_INDEXES {
            manager
                .drop_index(Index::drop().name(name).table(Alias::new(table)).to_owned())
                .await?;
        }
        manager
            .drop_index(Index::drop().name("idx_audit_logs_table").table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_audit_logs_created").table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_inventory_status").table(Inventory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Owned { UserId }

#[derive(DeriveIden)]
enum AuditLogs { Table, TableName, CreatedAt }

#[derive(DeriveIden)]
enum Inventory { Table, Status }
