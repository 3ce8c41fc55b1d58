//! Process-local `UserRepository` used when no database is configured.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Address, NewAddress, NewUser, User, UserId};
use crate::outbound::security::SharedClock;

#[derive(Default)]
struct UserTable {
    rows: BTreeMap<i64, User>,
    next_user_id: i64,
    next_address_id: i64,
}

impl UserTable {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.rows
            .values()
            .any(|user| user.email == email && Some(user.id) != except)
    }
}

/// Accounts held in a mutex-guarded map; emails stay unique.
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
    clock: SharedClock,
}

impl InMemoryUserRepository {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            table: Mutex::new(UserTable::default()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, UserTable>, UserPersistenceError> {
        self.table
            .lock()
            .map_err(|_| UserPersistenceError::query("user table lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let now = self.clock.utc();
        let mut table = self.lock()?;
        if table.email_taken(&user.email, None) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_str()));
        }
        table.next_user_id += 1;
        let stored = User {
            id: UserId::new(table.next_user_id),
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            role: user.role.clone(),
            verified: user.verified,
            permissions: user.permissions.clone(),
            phone: user.phone.clone(),
            addresses: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(stored.id.get(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.rows.get(&id.get()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()?
            .rows
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    async fn save(&self, user: &User) -> Result<Option<User>, UserPersistenceError> {
        let now = self.clock.utc();
        let mut table = self.lock()?;
        if table.email_taken(&user.email, Some(user.id)) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_str()));
        }
        let Some(stored) = table.rows.get_mut(&user.id.get()) else {
            return Ok(None);
        };
        // Addresses change only through their own methods.
        let addresses = std::mem::take(&mut stored.addresses);
        *stored = User {
            addresses,
            created_at: stored.created_at,
            updated_at: now,
            ..user.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.rows.remove(&id.get()).is_some())
    }

    async fn add_address(
        &self,
        user_id: UserId,
        address: &NewAddress,
    ) -> Result<Option<Address>, UserPersistenceError> {
        let mut table = self.lock()?;
        if !table.rows.contains_key(&user_id.get()) {
            return Ok(None);
        }
        table.next_address_id += 1;
        let stored = Address {
            id: table.next_address_id,
            user_id,
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
        };
        if let Some(user) = table.rows.get_mut(&user_id.get()) {
            user.addresses.push(stored.clone());
        }
        Ok(Some(stored))
    }

    async fn remove_address(
        &self,
        user_id: UserId,
        address_id: i64,
    ) -> Result<bool, UserPersistenceError> {
        let mut table = self.lock()?;
        let Some(user) = table.rows.get_mut(&user_id.get()) else {
            return Ok(false);
        };
        let before = user.addresses.len();
        user.addresses.retain(|address| address.id != address_id);
        Ok(user.addresses.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use mockable::DefaultClock;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::PasswordDigest;

    #[fixture]
    fn repo() -> InMemoryUserRepository {
        InMemoryUserRepository::new(Arc::new(DefaultClock))
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".to_owned(),
            email: email.to_owned(),
            password: PasswordDigest::new("digest"),
            role: "user".to_owned(),
            phone: String::new(),
            verified: false,
            permissions: BTreeSet::new(),
        }
    }

    fn home() -> NewAddress {
        NewAddress {
            street: "1 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: String::new(),
            zip_code: String::new(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn ids_increase_and_emails_stay_unique(repo: InMemoryUserRepository) {
        let first = repo.create(&new_user("a@example.com")).await.expect("first");
        let second = repo.create(&new_user("b@example.com")).await.expect("second");
        assert!(second.id.get() > first.id.get());

        let err = repo
            .create(&new_user("a@example.com"))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn save_keeps_addresses_and_rejects_taken_email(repo: InMemoryUserRepository) {
        let ada = repo.create(&new_user("a@example.com")).await.expect("ada");
        repo.create(&new_user("b@example.com")).await.expect("bob");
        repo.add_address(ada.id, &home()).await.expect("address");

        let mut renamed = ada.clone();
        renamed.name = "Ada L".to_owned();
        let saved = repo.save(&renamed).await.expect("save").expect("present");
        assert_eq!(saved.name, "Ada L");
        assert_eq!(saved.addresses.len(), 1);

        renamed.email = "b@example.com".to_owned();
        let err = repo.save(&renamed).await.expect_err("email taken");
        assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn addresses_belong_to_their_owner(repo: InMemoryUserRepository) {
        let ada = repo.create(&new_user("a@example.com")).await.expect("ada");
        let bob = repo.create(&new_user("b@example.com")).await.expect("bob");
        let address = repo
            .add_address(ada.id, &home())
            .await
            .expect("insert")
            .expect("owner exists");

        assert!(!repo.remove_address(bob.id, address.id).await.expect("query"));
        assert!(repo.remove_address(ada.id, address.id).await.expect("query"));
        assert!(
            repo.add_address(UserId::new(99), &home())
                .await
                .expect("query")
                .is_none()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn delete_reports_presence(repo: InMemoryUserRepository) {
        let ada = repo.create(&new_user("a@example.com")).await.expect("ada");
        assert!(repo.delete(ada.id).await.expect("delete"));
        assert!(!repo.delete(ada.id).await.expect("delete again"));
        assert!(repo.find_by_email("a@example.com").await.expect("find").is_none());
    }
}
