//! Builders for the HTTP state: cryptographic adapters plus either Diesel or
//! in-memory stores depending on whether a pool is configured.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use inventory_backend::domain::ports::{CredentialHashError, TokenError};
use inventory_backend::domain::resources::{Inventory, Item, Order, Product, Shipment, Supplier, Vendor};
use inventory_backend::inbound::http::state::{HttpState, HttpStatePorts};
use inventory_backend::outbound::memory::{InMemoryResourceStore, InMemoryUserRepository};
use inventory_backend::outbound::persistence::{
    DbPool, DieselInventoryStore, DieselItemStore, DieselOrderStore, DieselProductStore,
    DieselShipmentStore, DieselSupplierStore, DieselUserRepository, DieselVendorStore,
};
use inventory_backend::outbound::security::{
    Argon2CredentialHasher, JwtTokenService, SharedClock,
};

use super::ServerConfig;

/// Adapters that could not be constructed from the configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    #[error("password hasher: {0}")]
    Hasher(#[from] CredentialHashError),
    #[error("token service: {0}")]
    Tokens(#[from] TokenError),
}

fn diesel_ports(
    pool: &DbPool,
    hasher: Arc<Argon2CredentialHasher>,
    tokens: Arc<JwtTokenService>,
) -> HttpStatePorts {
    HttpStatePorts {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        hasher,
        tokens,
        inventory: Arc::new(DieselInventoryStore::new(pool.clone())),
        items: Arc::new(DieselItemStore::new(pool.clone())),
        products: Arc::new(DieselProductStore::new(pool.clone())),
        orders: Arc::new(DieselOrderStore::new(pool.clone())),
        shipments: Arc::new(DieselShipmentStore::new(pool.clone())),
        suppliers: Arc::new(DieselSupplierStore::new(pool.clone())),
        vendors: Arc::new(DieselVendorStore::new(pool.clone())),
    }
}

fn memory_ports(
    clock: &SharedClock,
    hasher: Arc<Argon2CredentialHasher>,
    tokens: Arc<JwtTokenService>,
) -> HttpStatePorts {
    HttpStatePorts {
        users: Arc::new(InMemoryUserRepository::new(Arc::clone(clock))),
        hasher,
        tokens,
        inventory: Arc::new(InMemoryResourceStore::<Inventory>::new(Arc::clone(clock))),
        items: Arc::new(InMemoryResourceStore::<Item>::new(Arc::clone(clock))),
        products: Arc::new(InMemoryResourceStore::<Product>::new(Arc::clone(clock))),
        orders: Arc::new(InMemoryResourceStore::<Order>::new(Arc::clone(clock))),
        shipments: Arc::new(InMemoryResourceStore::<Shipment>::new(Arc::clone(clock))),
        suppliers: Arc::new(InMemoryResourceStore::<Supplier>::new(Arc::clone(clock))),
        vendors: Arc::new(InMemoryResourceStore::<Vendor>::new(Arc::clone(clock))),
    }
}

/// Assemble the shared HTTP state for every worker.
pub(super) fn build_http_state(
    config: &ServerConfig,
) -> Result<web::Data<HttpState>, StateBuildError> {
    let clock: SharedClock = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2CredentialHasher::new(config.hashing)?);
    let tokens = Arc::new(JwtTokenService::new(&config.jwt_secret, Arc::clone(&clock))?);

    let ports = match &config.db_pool {
        Some(pool) => diesel_ports(pool, hasher, tokens),
        None => memory_ports(&clock, hasher, tokens),
    };
    Ok(web::Data::new(HttpState::new(ports)))
}
