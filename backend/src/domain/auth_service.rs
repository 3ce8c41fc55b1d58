//! Registration and login.
//!
//! Passwords are hashed on the blocking pool through [`PasswordHashing`];
//! only digests reach the user repository.

use std::sync::Arc;

use tracing::{error, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    CredentialHashError, CredentialHasher, TokenService, UserPersistenceError, UserRepository,
};
use crate::domain::{
    DEFAULT_PERMISSIONS, Error, IssuedToken, LoginCredentials, NewUser, PasswordDigest,
    RegistrationDetails, TraceId, User,
};

pub(crate) const DUPLICATE_EMAIL_MESSAGE: &str = "User with this email already exists";
pub(crate) const USER_NOT_FOUND_MESSAGE: &str = "User not found";
pub(crate) const INVALID_PASSWORD_MESSAGE: &str = "Invalid password";

/// Map user repository failures onto domain errors.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict(DUPLICATE_EMAIL_MESSAGE),
        UserPersistenceError::InUse { .. } => {
            Error::conflict("User is still referenced by other records")
        }
    }
}

/// Runs a [`CredentialHasher`] off the async workers.
#[derive(Clone)]
pub(crate) struct PasswordHashing {
    hasher: Arc<dyn CredentialHasher>,
}

impl PasswordHashing {
    pub(crate) fn new(hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { hasher }
    }

    pub(crate) async fn hash(&self, secret: &str) -> Result<PasswordDigest, Error> {
        let hasher = Arc::clone(&self.hasher);
        let secret = Zeroizing::new(secret.to_owned());
        TraceId::spawn_blocking(move || hasher.hash(secret.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| {
                error!(error = %err, "password hashing failed");
                Error::internal("Failed to hash password")
            })
    }

    /// `Ok(false)` on mismatch; an unreadable stored digest is an internal
    /// error, never a silent rejection.
    pub(crate) async fn verify(&self, secret: &str, digest: &PasswordDigest) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let secret = Zeroizing::new(secret.to_owned());
        let digest = digest.clone();
        TraceId::spawn_blocking(move || hasher.verify(secret.as_str(), &digest))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(|err| {
                match &err {
                    CredentialHashError::Malformed { .. } => {
                        error!(error = %err, "stored password digest is unreadable");
                    }
                    CredentialHashError::Hashing { .. } => {
                        error!(error = %err, "password verification failed");
                    }
                }
                Error::internal("Failed to verify password")
            })
    }
}

/// Self-service registration and token issuance.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: PasswordHashing,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords: PasswordHashing::new(hasher),
            tokens,
        }
    }

    /// Create an account with the default permission set.
    ///
    /// Fails with a conflict when the email is already registered; no second
    /// row is written in that case.
    pub async fn register(&self, details: RegistrationDetails) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_email(details.email())
            .await
            .map_err(map_user_persistence_error)?;
        if existing.is_some() {
            return Err(Error::conflict(DUPLICATE_EMAIL_MESSAGE));
        }

        let password = self.passwords.hash(details.password()).await?;
        let new_user = NewUser {
            name: details.name().to_owned(),
            email: details.email().to_owned(),
            password,
            role: details.role().to_owned(),
            phone: details.phone().to_owned(),
            verified: false,
            permissions: DEFAULT_PERMISSIONS.iter().map(|p| (*p).to_owned()).collect(),
        };
        let user = self
            .users
            .create(&new_user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Check credentials and issue a token.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedToken, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND_MESSAGE))?;

        if !self
            .passwords
            .verify(credentials.password(), &user.password)
            .await?
        {
            return Err(Error::unauthorized(INVALID_PASSWORD_MESSAGE));
        }

        self.tokens.issue(user.id, &user.role).map_err(|err| {
            error!(error = %err, user_id = %user.id, "token issuance failed");
            Error::internal("Failed to generate token")
        })
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
