//! Wire shapes for user accounts.
//!
//! [`UserResponse`] is the only way a [`User`] leaves the service, so the
//! password digest cannot be serialised by accident.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Address, NewAddress, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AddressResponse {
    pub id: i64,
    pub user_id: i64,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            user_id: address.user_id.get(),
            street: address.street,
            city: address.city,
            state: address.state,
            zip_code: address.zip_code,
        }
    }
}

/// Account as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub verified: bool,
    /// Sorted lexically.
    pub permissions: Vec<String>,
    pub phone: String,
    pub addresses: Vec<AddressResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name,
            email: user.email,
            role: user.role,
            verified: user.verified,
            permissions: user.permissions.into_iter().collect(),
            phone: user.phone,
            addresses: user.addresses.into_iter().map(AddressResponse::from).collect(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Body of `POST /api/users/{id}/add-address`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AddressRequest {
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
}

impl From<AddressRequest> for NewAddress {
    fn from(request: AddressRequest) -> Self {
        Self {
            street: request.street,
            city: request.city,
            state: request.state,
            zip_code: request.zip_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::{PasswordDigest, UserId};

    #[rstest]
    fn response_never_carries_the_digest() {
        let now = Utc::now();
        let user = User {
            id: UserId::new(3),
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: PasswordDigest::new("$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA"),
            role: "user".to_owned(),
            verified: false,
            permissions: ["manage_team".to_owned(), "approve_transactions".to_owned()].into(),
            phone: String::new(),
            addresses: vec![Address {
                id: 1,
                user_id: UserId::new(3),
                street: "1 Main St".to_owned(),
                city: "Springfield".to_owned(),
                state: "IL".to_owned(),
                zip_code: "62701".to_owned(),
            }],
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserResponse::from(user)).expect("serialise");
        assert!(json.get("password").is_none());
        assert!(!json.to_string().contains("argon2id"));
        assert_eq!(
            json["permissions"],
            serde_json::json!(["approve_transactions", "manage_team"])
        );
        assert_eq!(json["addresses"][0]["zip_code"], "62701");
    }
}
