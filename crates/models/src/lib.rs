//! SeaORM entities for the consignment backend, their caller-visible field
//! allow-lists, and the shared database handle.

pub mod errors;
pub mod db;
pub mod resource;

pub mod inventory;
pub mod consignments;
pub mod deliveries;
pub mod payments;
pub mod issues;
pub mod audit_logs;
pub mod users_extended;

pub use resource::Resource;

/// Check every entity's allow-list; called once before the server binds.
pub fn validate_all() -> Result<(), errors::ModelError> {
    inventory::Entity::validate_fields()?;
    consignments::Entity::validate_fields()?;
    deliveries::Entity::validate_fields()?;
    payments::Entity::validate_fields()?;
    issues::Entity::validate_fields()?;
    audit_logs::Entity::validate_fields()?;
    users_extended::Entity::validate_fields()?;
    Ok(())
}
