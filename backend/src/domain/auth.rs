//! Authentication primitives: login credentials, registration details and
//! password digests.
//!
//! Inbound adapters hand raw strings to the constructors here so validation
//! happens once, before any service or port is involved. Secrets are held in
//! [`Zeroizing`] buffers and wiped on drop.

use std::fmt;

use serde_json::json;
use zeroize::Zeroizing;

use super::Error;

/// Role assigned to self-registered accounts when none is supplied.
pub const DEFAULT_ROLE: &str = "user";

/// Permissions granted to every newly registered account.
pub const DEFAULT_PERMISSIONS: [&str; 3] = ["view_reports", "approve_transactions", "manage_team"];

/// Validation failures for authentication payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email lacks a local part or domain.
    InvalidEmail,
    /// Password was empty.
    EmptyPassword,
}

impl CredentialValidationError {
    /// Name of the offending payload field.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyPassword => "password",
        }
    }

    /// Stable machine-readable code for the failure.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyEmail => "empty_email",
            Self::InvalidEmail => "invalid_email",
            Self::EmptyPassword => "empty_password",
        }
    }
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@domain"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

impl From<CredentialValidationError> for Error {
    fn from(err: CredentialValidationError) -> Self {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": err.field(), "code": err.code() }))
    }
}

/// Check a replacement password before hashing it.
pub fn validate_new_password(password: &str) -> Result<(), CredentialValidationError> {
    require_password(password).map(drop)
}

/// Normalise an email address for storage and lookup.
///
/// Emails are trimmed and lower-cased; a value without a non-empty local part
/// and domain around a single `@` is rejected.
///
/// # Examples
/// ```
/// use inventory_backend::domain::normalize_email;
///
/// assert_eq!(normalize_email("  Ada@Example.COM ").unwrap(), "ada@example.com");
/// assert!(normalize_email("nobody").is_err());
/// ```
pub fn normalize_email(raw: &str) -> Result<String, CredentialValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CredentialValidationError::EmptyEmail);
    }
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(trimmed.to_lowercase())
        }
        _ => Err(CredentialValidationError::InvalidEmail),
    }
}

fn require_password(password: &str) -> Result<Zeroizing<String>, CredentialValidationError> {
    if password.is_empty() {
        return Err(CredentialValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials used by the authentication service.
///
/// ## Invariants
/// - `email` is normalised by [`normalize_email`].
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use inventory_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("a@b.com", "pw1").unwrap();
/// assert_eq!(creds.email(), "a@b.com");
/// assert_eq!(creds.password(), "pw1");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            email: normalize_email(email)?,
            password: require_password(password)?,
        })
    }

    /// Normalised email used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated self-registration request.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationDetails {
    name: String,
    email: String,
    password: Zeroizing<String>,
    role: String,
    phone: String,
}

impl RegistrationDetails {
    /// Validate the raw registration fields.
    ///
    /// Blank or missing roles fall back to [`DEFAULT_ROLE`].
    pub fn try_from_parts(
        name: Option<&str>,
        email: &str,
        password: &str,
        role: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, CredentialValidationError> {
        let role = role
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_ROLE);
        Ok(Self {
            name: name.map(str::trim).unwrap_or_default().to_owned(),
            email: normalize_email(email)?,
            password: require_password(password)?,
            role: role.to_owned(),
            phone: phone.map(str::trim).unwrap_or_default().to_owned(),
        })
    }

    /// Display name, possibly empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalised email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Plain-text password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Requested role.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Contact phone number, possibly empty.
    pub fn phone(&self) -> &str {
        &self.phone
    }
}

impl fmt::Debug for RegistrationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDetails")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// One-way, salted digest of a password in PHC string format.
///
/// Digests are only ever compared through a credential hasher, never byte
/// for byte.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a stored digest string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded digest suitable for persistence.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}
