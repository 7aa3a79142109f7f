//! PostgreSQL persistence adapters using Diesel with `diesel-async`.
//!
//! Repositories only translate between Diesel rows and domain records; all
//! business rules live in the domain services. Row structs (`models.rs`) and
//! the table definitions (`schema.rs`) stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use odonto_backend::outbound::persistence::{DbPool, DieselCaseRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/odonto")).await?;
//! let cases = DieselCaseRepository::new(pool);
//! ```

mod diesel_record_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_record_repository::{
    DieselCaseRepository, DieselDentalRecordRepository, DieselEvidenceRepository,
    DieselReportRepository, DieselUserRepository,
};
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
