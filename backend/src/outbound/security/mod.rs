//! Cryptographic adapters: password hashing and signed identity tokens.

mod argon2_hasher;
mod jwt_tokens;

pub use argon2_hasher::{Argon2CredentialHasher, HashingParams};
pub use jwt_tokens::{JwtTokenService, SharedClock};
