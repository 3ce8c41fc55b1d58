//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CredentialHasher, ResourceStore, TokenService, UserRepository};
use crate::domain::resources::{Inventory, Item, Order, Product, Shipment, Supplier, Vendor};
use crate::domain::{AccountService, AuthService, ResourceService};

/// Parameter object bundling the port implementations behind the services.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub tokens: Arc<dyn TokenService>,
    pub inventory: Arc<dyn ResourceStore<Inventory>>,
    pub items: Arc<dyn ResourceStore<Item>>,
    pub products: Arc<dyn ResourceStore<Product>>,
    pub orders: Arc<dyn ResourceStore<Order>>,
    pub shipments: Arc<dyn ResourceStore<Shipment>>,
    pub suppliers: Arc<dyn ResourceStore<Supplier>>,
    pub vendors: Arc<dyn ResourceStore<Vendor>>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: AuthService,
    pub accounts: AccountService,
    /// Shared with the bearer middleware guarding the protected scope.
    pub tokens: Arc<dyn TokenService>,
    pub inventory: ResourceService<Inventory>,
    pub items: ResourceService<Item>,
    pub products: ResourceService<Product>,
    pub orders: ResourceService<Order>,
    pub shipments: ResourceService<Shipment>,
    pub suppliers: ResourceService<Supplier>,
    pub vendors: ResourceService<Vendor>,
}

impl HttpState {
    /// Build every service from its ports.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            hasher,
            tokens,
            inventory,
            items,
            products,
            orders,
            shipments,
            suppliers,
            vendors,
        } = ports;
        Self {
            auth: AuthService::new(Arc::clone(&users), Arc::clone(&hasher), Arc::clone(&tokens)),
            accounts: AccountService::new(users, hasher),
            tokens,
            inventory: ResourceService::new(inventory),
            items: ResourceService::new(items),
            products: ResourceService::new(products),
            orders: ResourceService::new(orders),
            shipments: ResourceService::new(shipments),
            suppliers: ResourceService::new(suppliers),
            vendors: ResourceService::new(vendors),
        }
    }
}
