//! PostgreSQL/PostGIS persistence adapters.
//!
//! Diesel row structs and table definitions stay private to this module;
//! repositories translate them to domain types at the boundary.

mod diesel_helpers;
mod diesel_stand_point_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_stand_point_repository::DieselStandPointRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
