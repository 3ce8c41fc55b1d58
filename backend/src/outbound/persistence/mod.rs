//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows (`models.rs`, `schema.rs`) and
//! domain types; neither leaves this module. Connections come from a shared
//! `bb8` pool through `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use inventory_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::connect(PoolConfig::new("postgres://localhost/inventory")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_resource_stores;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_resource_stores::{
    DieselInventoryStore, DieselItemStore, DieselOrderStore, DieselProductStore,
    DieselShipmentStore, DieselSupplierStore, DieselVendorStore,
};
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError};
