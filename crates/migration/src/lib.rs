//! Migrator registering one migration per table. Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_inventory;
mod m20240601_000002_create_consignments;
mod m20240601_000003_create_deliveries;
mod m20240601_000004_create_payments;
mod m20240601_000005_create_issues;
mod m20240601_000006_create_audit_logs;
mod m20240601_000007_create_users_extended;
mod m20240601_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_inventory::Migration),
            Box::new(m20240601_000002_create_consignments::Migration),
            Box::new(m20240601_000003_create_deliveries::Migration),
            Box::new(m20240601_000004_create_payments::Migration),
            Box::new(m20240601_000005_create_issues::Migration),
            Box::new(m20240601_000006_create_audit_logs::Migration),
            Box::new(m20240601_000007_create_users_extended::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000010_add_indexes::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_names_are_unique_and_ordered() {
        let names: Vec<String> = Migrator::migrations().iter().map(|m| m.name().to_string()).collect();
        assert_eq!(names.len(), 8);
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        sorted.dedup();
        assert_eq!(sorted.len(), 8);
        assert!(names.last().unwrap().ends_with("add_indexes"));
    }
}
