//! Account management: the caller's own profile and administrative user
//! operations.
//!
//! Mutations load the account, change it in memory and save it back through
//! the [`UserRepository`]. Addresses are the exception and go through their
//! own port methods.

use std::sync::Arc;

use tracing::info;

use crate::domain::auth_service::{
    DUPLICATE_EMAIL_MESSAGE, INVALID_PASSWORD_MESSAGE, PasswordHashing, USER_NOT_FOUND_MESSAGE,
    map_user_persistence_error,
};
use crate::domain::ports::{CredentialHasher, UserRepository};
use crate::domain::resources::validation::require_text;
use crate::domain::{
    Address, AuthenticatedUser, Error, NewAddress, User, UserChanges, UserId, normalize_email,
    validate_new_password,
};

/// Fields a caller may change on their own profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Profile and user administration use-cases.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: PasswordHashing,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            users,
            passwords: PasswordHashing::new(hasher),
        }
    }

    // Profile

    /// The authenticated caller's own account.
    pub async fn profile(&self, actor: &AuthenticatedUser) -> Result<User, Error> {
        self.get_user(actor.user_id()).await
    }

    pub async fn update_profile(
        &self,
        actor: &AuthenticatedUser,
        changes: ProfileChanges,
    ) -> Result<User, Error> {
        self.update_user(
            actor.user_id(),
            UserChanges {
                name: changes.name,
                email: changes.email,
                phone: changes.phone,
                role: None,
                verified: None,
            },
        )
        .await
    }

    /// Replace the caller's password after confirming the current one.
    pub async fn change_own_password(
        &self,
        actor: &AuthenticatedUser,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        validate_new_password(new_password)?;
        let mut user = self.get_user(actor.user_id()).await?;
        if !self.passwords.verify(current_password, &user.password).await? {
            return Err(Error::unauthorized(INVALID_PASSWORD_MESSAGE));
        }
        user.password = self.passwords.hash(new_password).await?;
        self.save(user).await?;
        info!(user_id = %actor.user_id(), "password changed by owner");
        Ok(())
    }

    // Administration

    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_persistence_error)
    }

    pub async fn get_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(user_not_found)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, Error> {
        let email = normalize_email(email)?;
        self.users
            .find_by_email(&email)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(user_not_found)
    }

    /// Apply a partial update. A changed email must stay unique.
    pub async fn update_user(&self, id: UserId, mut changes: UserChanges) -> Result<User, Error> {
        if let Some(email) = changes.email.take() {
            changes.email = Some(normalize_email(&email)?);
        }
        if let Some(name) = &changes.name {
            require_text("name", name)?;
        }
        let mut user = self.get_user(id).await?;
        if let Some(email) = changes.email.as_deref() {
            if email != user.email {
                self.ensure_email_free(email).await?;
            }
        }
        if !changes.apply_to(&mut user) {
            return Ok(user);
        }
        self.save(user).await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        let removed = self
            .users
            .delete(id)
            .await
            .map_err(map_user_persistence_error)?;
        if removed {
            info!(user_id = %id, "user deleted");
            Ok(())
        } else {
            Err(user_not_found())
        }
    }

    /// Set a new password without checking the old one.
    pub async fn set_password(&self, id: UserId, new_password: &str) -> Result<(), Error> {
        validate_new_password(new_password)?;
        let mut user = self.get_user(id).await?;
        user.password = self.passwords.hash(new_password).await?;
        self.save(user).await?;
        info!(user_id = %id, "password replaced");
        Ok(())
    }

    /// Set a new password for the account registered under `email`.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), Error> {
        validate_new_password(new_password)?;
        let mut user = self.find_by_email(email).await?;
        user.password = self.passwords.hash(new_password).await?;
        let id = user.id;
        self.save(user).await?;
        info!(user_id = %id, "password reset");
        Ok(())
    }

    pub async fn set_verified(&self, email: &str, verified: bool) -> Result<(), Error> {
        let mut user = self.find_by_email(email).await?;
        if user.verified == verified {
            return Ok(());
        }
        user.verified = verified;
        self.save(user).await.map(drop)
    }

    pub async fn add_role(&self, id: UserId, role: &str) -> Result<(), Error> {
        require_text("role", role)?;
        let mut user = self.get_user(id).await?;
        role.trim().clone_into(&mut user.role);
        self.save(user).await.map(drop)
    }

    /// Clear the account's role, leaving it empty.
    pub async fn remove_role(&self, id: UserId) -> Result<(), Error> {
        let mut user = self.get_user(id).await?;
        user.role.clear();
        self.save(user).await.map(drop)
    }

    pub async fn add_permission(&self, id: UserId, permission: &str) -> Result<(), Error> {
        require_text("permission", permission)?;
        let mut user = self.get_user(id).await?;
        if user.grant_permission(permission.trim()) {
            self.save(user).await?;
        }
        Ok(())
    }

    /// Remove a permission; absent permissions are ignored.
    pub async fn remove_permission(&self, id: UserId, permission: &str) -> Result<(), Error> {
        require_text("permission", permission)?;
        let mut user = self.get_user(id).await?;
        if user.revoke_permission(permission.trim()) {
            self.save(user).await?;
        }
        Ok(())
    }

    pub async fn add_address(&self, id: UserId, address: NewAddress) -> Result<Address, Error> {
        require_text("street", &address.street)?;
        require_text("city", &address.city)?;
        self.users
            .add_address(id, &address)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(user_not_found)
    }

    pub async fn remove_address(&self, id: UserId, address_id: i64) -> Result<(), Error> {
        let removed = self
            .users
            .remove_address(id, address_id)
            .await
            .map_err(map_user_persistence_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found("Address not found"))
        }
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), Error> {
        let taken = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_persistence_error)?;
        if taken.is_some() {
            return Err(Error::conflict(DUPLICATE_EMAIL_MESSAGE));
        }
        Ok(())
    }

    async fn save(&self, user: User) -> Result<User, Error> {
        self.users
            .save(&user)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(user_not_found)
    }
}

fn user_not_found() -> Error {
    Error::not_found(USER_NOT_FOUND_MESSAGE)
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
