//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Rows (`models`) and table definitions (`schema`) stay private to
//! this module; all database failures surface as
//! [`crate::domain::ports::ExchangeRepositoryError`].

mod diesel_basic_error_mapping;
mod diesel_exchange_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_exchange_repository::DieselExchangeRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
