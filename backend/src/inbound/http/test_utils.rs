//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use zeroize::Zeroizing;

use crate::domain::{AuthenticatedUser, UserId};
use crate::domain::resources::{Inventory, Item, Order, Product, Shipment, Supplier, Vendor};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{InMemoryResourceStore, InMemoryUserRepository};
use crate::outbound::security::{
    Argon2CredentialHasher, HashingParams, JwtTokenService, SharedClock,
};

pub(crate) const TEST_SECRET: &str = "test-signing-secret";

/// Argon2 parameters cheap enough for unit tests.
pub(crate) fn cheap_hashing() -> HashingParams {
    HashingParams {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    }
}

/// State wired to in-memory stores, a cheap hasher and a real token service.
pub(crate) fn test_state() -> web::Data<HttpState> {
    let clock: SharedClock = Arc::new(DefaultClock);
    let hasher = Argon2CredentialHasher::new(cheap_hashing()).expect("valid argon2 params");
    let tokens = JwtTokenService::new(&Zeroizing::new(TEST_SECRET.to_owned()), Arc::clone(&clock))
        .expect("token service");
    web::Data::new(HttpState::new(HttpStatePorts {
        users: Arc::new(InMemoryUserRepository::new(Arc::clone(&clock))),
        hasher: Arc::new(hasher),
        tokens: Arc::new(tokens),
        inventory: Arc::new(InMemoryResourceStore::<Inventory>::new(Arc::clone(&clock))),
        items: Arc::new(InMemoryResourceStore::<Item>::new(Arc::clone(&clock))),
        products: Arc::new(InMemoryResourceStore::<Product>::new(Arc::clone(&clock))),
        orders: Arc::new(InMemoryResourceStore::<Order>::new(Arc::clone(&clock))),
        shipments: Arc::new(InMemoryResourceStore::<Shipment>::new(Arc::clone(&clock))),
        suppliers: Arc::new(InMemoryResourceStore::<Supplier>::new(Arc::clone(&clock))),
        vendors: Arc::new(InMemoryResourceStore::<Vendor>::new(clock)),
    }))
}

/// Identity to insert into request extensions when bypassing the middleware.
pub(crate) fn caller(id: i64) -> AuthenticatedUser {
    AuthenticatedUser::new(UserId::new(id), "admin")
}

pub(crate) use crate::inbound::http::router::{json_config, path_config, query_config};
