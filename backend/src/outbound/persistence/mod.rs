//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; no business rules live here. Row structs (`models.rs`) and the
//! table definitions (`schema.rs`) stay private to this module. Connections
//! come from a `bb8` pool driven by `diesel-async`.
//!
//! ```rust,no_run
//! use carematch::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/carematch")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_helpers;
mod diesel_identity_repositories;
mod diesel_ledger_repositories;
mod diesel_patient_repository;
mod diesel_service_request_repository;
mod diesel_support_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_identity_repositories::{DieselNurseRepository, DieselUserRepository};
pub use diesel_ledger_repositories::{
    DieselMessageRepository, DieselReviewRepository, DieselTransactionRepository,
};
pub use diesel_patient_repository::DieselPatientRepository;
pub use diesel_service_request_repository::DieselServiceRequestRepository;
pub use diesel_support_repository::DieselSupportRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
