//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Address, NewAddress, NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
        /// The account is still referenced, for example by orders.
        InUse { message: String } => "user is still referenced: {message}",
    }
}

/// Storage for accounts and their addresses.
///
/// Lookups return `Ok(None)` for absent rows; mutations of a missing account
/// return `Ok(false)` so services decide how to report it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account and return it with its assigned identifier.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch an account, including addresses.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account by its normalised email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    /// List every account ordered by identifier.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Persist the scalar fields, digest and permissions of an existing
    /// account. Addresses are managed separately.
    async fn save(&self, user: &User) -> Result<Option<User>, UserPersistenceError>;

    /// Delete an account and its addresses.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;

    /// Attach an address; `Ok(None)` when the account does not exist.
    async fn add_address(
        &self,
        id: UserId,
        address: &NewAddress,
    ) -> Result<Option<Address>, UserPersistenceError>;

    /// Detach an address owned by the account.
    async fn remove_address(
        &self,
        id: UserId,
        address_id: i64,
    ) -> Result<bool, UserPersistenceError>;
}
