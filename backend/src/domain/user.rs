//! User accounts, their addresses and the mutations services apply to them.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::auth::PasswordDigest;

/// Database identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Postal address attached to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: i64,
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Address fields supplied when attaching a new address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Stored user account.
///
/// ## Invariants
/// - `email` is unique across accounts and stored normalised.
/// - `password` is a digest; plain-text passwords never reach this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: PasswordDigest,
    pub role: String,
    pub verified: bool,
    pub permissions: BTreeSet<String>,
    pub phone: String,
    pub addresses: Vec<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Add a permission. Returns `false` if it was already granted.
    pub fn grant_permission(&mut self, permission: &str) -> bool {
        self.permissions.insert(permission.to_owned())
    }

    /// Remove a permission. Removing an absent permission is a no-op.
    ///
    /// # Examples
    /// ```
    /// # use inventory_backend::domain::{User, UserId, PasswordDigest};
    /// # use chrono::Utc;
    /// # let mut user = User {
    /// #     id: UserId::new(1), name: String::new(), email: "a@b.c".into(),
    /// #     password: PasswordDigest::new("x"), role: "user".into(), verified: false,
    /// #     permissions: ["manage_team".to_owned()].into(), phone: String::new(),
    /// #     addresses: Vec::new(), created_at: Utc::now(), updated_at: Utc::now(),
    /// # };
    /// assert!(user.revoke_permission("manage_team"));
    /// assert!(!user.revoke_permission("manage_team"));
    /// ```
    pub fn revoke_permission(&mut self, permission: &str) -> bool {
        self.permissions.remove(permission)
    }
}

/// Account row to insert on registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: PasswordDigest,
    pub role: String,
    pub phone: String,
    pub verified: bool,
    pub permissions: BTreeSet<String>,
}

/// Partial update of an account's descriptive fields.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub verified: Option<bool>,
}

impl UserChanges {
    /// Apply the changes in place. Returns `true` if anything was supplied.
    pub fn apply_to(self, user: &mut User) -> bool {
        let mut touched = false;
        if let Some(name) = self.name {
            user.name = name;
            touched = true;
        }
        if let Some(email) = self.email {
            user.email = email;
            touched = true;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
            touched = true;
        }
        if let Some(role) = self.role {
            user.role = role;
            touched = true;
        }
        if let Some(verified) = self.verified {
            user.verified = verified;
            touched = true;
        }
        touched
    }
}

#[cfg(test)]
mod tests;
