//! Domain primitives, services and ports.
//!
//! Purpose: hold the supply-chain model and the authentication rules
//! independent of HTTP and of the database. Inbound adapters call the
//! services here; outbound adapters implement [`ports`].
//!
//! Public surface:
//! - `Error`/`ErrorCode`: transport-agnostic failure payload.
//! - `TraceId`: request correlation identifier.
//! - `AuthService`, `AccountService`, `ResourceService`: use-cases.
//! - `User`, `Address`, resource records and their drafts/patches/filters.

pub mod account_service;
pub mod auth;
pub mod auth_service;
pub mod error;
pub mod identity;
pub mod ports;
pub mod resources;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, ProfileChanges};
pub use self::auth::{
    CredentialValidationError, DEFAULT_PERMISSIONS, DEFAULT_ROLE, LoginCredentials,
    PasswordDigest, RegistrationDetails, normalize_email, validate_new_password,
};
pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity::{AuthenticatedUser, IssuedToken, TOKEN_TTL_HOURS, TokenClaims};
pub use self::resources::{Resource, ResourceService};
pub use self::trace_id::TraceId;
pub use self::user::{Address, NewAddress, NewUser, User, UserChanges, UserId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use inventory_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
