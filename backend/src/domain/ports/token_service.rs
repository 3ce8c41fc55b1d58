//! Port for issuing and verifying signed identity tokens.

use crate::domain::{IssuedToken, TokenClaims, UserId};

use super::define_port_error;

define_port_error! {
    /// Token failures.
    ///
    /// The display text is deliberately generic; it is echoed to clients in
    /// the `Invalid token: <reason>` response.
    pub enum TokenError {
        /// Not a well-formed token or required claims are missing.
        Malformed => "token is malformed",
        /// The header names an algorithm other than the configured one.
        UnexpectedAlgorithm => "unexpected signing method",
        /// The signature does not match the signing secret.
        BadSignature => "signature is invalid",
        /// The token is past its expiry.
        Expired => "token has expired",
        /// The service was constructed with unusable key material.
        Configuration { message: String } => "token service misconfigured: {message}",
        /// Encoding the token failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Stateless token issuance and verification.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token for the given account.
    fn issue(&self, user_id: UserId, role: &str) -> Result<IssuedToken, TokenError>;

    /// Check signature, algorithm and expiry, returning the embedded claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
