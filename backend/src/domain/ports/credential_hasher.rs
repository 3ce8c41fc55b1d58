//! Port for one-way password hashing.
//!
//! Implementations are CPU-bound and synchronous. Services call them through
//! [`crate::domain::TraceId::spawn_blocking`] so the async workers keep
//! serving other requests while a digest is computed.

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Failures raised by credential hashers.
    pub enum CredentialHashError {
        /// The stored digest could not be parsed.
        Malformed { message: String } => "stored password digest is malformed: {message}",
        /// Hashing itself failed, usually because the parameters were rejected.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted, tunable password hashing.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Derive a fresh digest with a new random salt.
    fn hash(&self, secret: &str) -> Result<PasswordDigest, CredentialHashError>;

    /// Check `secret` against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; only an unreadable digest is an error.
    fn verify(&self, secret: &str, digest: &PasswordDigest) -> Result<bool, CredentialHashError>;
}
