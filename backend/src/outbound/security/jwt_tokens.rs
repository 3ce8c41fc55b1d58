//! HS256 JSON Web Token implementation of the `TokenService` port.
//!
//! The library's own expiry check is disabled; expiry is compared against the
//! injected [`Clock`] with zero leeway so tests can move time.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{IssuedToken, TOKEN_TTL_HOURS, TokenClaims, UserId};

/// Shared clock handle.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// Signs and verifies identity tokens with a shared HMAC secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: SharedClock,
}

impl JwtTokenService {
    /// Build a service from the signing secret.
    ///
    /// # Errors
    /// Returns [`TokenError::Configuration`] when the secret is empty.
    pub fn new(secret: &Zeroizing<String>, clock: SharedClock) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::configuration("signing secret must not be empty"));
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        })
    }
}

fn map_jwt_error(error: &jsonwebtoken::errors::Error) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::bad_signature(),
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            TokenError::unexpected_algorithm()
        }
        ErrorKind::ExpiredSignature => TokenError::expired(),
        _ => TokenError::malformed(),
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: UserId, role: &str) -> Result<IssuedToken, TokenError> {
        let now = self.clock.utc();
        let expires_at = now + Duration::hours(TOKEN_TTL_HOURS);
        let claims = TokenClaims {
            user_id: user_id.get(),
            role: role.to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|err| map_jwt_error(&err))?;
        if self.clock.utc().timestamp() > data.claims.exp {
            return Err(TokenError::expired());
        }
        Ok(data.claims)
    }
}
