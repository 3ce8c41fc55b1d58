//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports only: the domain calls out through these traits and the
//! `outbound` adapters implement them.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_hasher;
mod resource_store;
mod token_service;
mod user_repository;

#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHasher};
pub use resource_store::{ResourceStore, ResourceStoreError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
