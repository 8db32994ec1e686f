//! Service layer: generic CRUD over any `models::Resource`, list query parsing,
//! and the admin operations.
//! - Handlers stay thin; every database access goes through here.
//! - Errors are `ServiceError`, mapped to HTTP statuses by the server crate.

pub mod errors;
pub mod query;
pub mod crud;
pub mod admin;
#[cfg(test)]
pub mod test_support;
