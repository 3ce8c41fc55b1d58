//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Addresses live in their own table and are loaded alongside the account on
//! every read so callers always see a complete [`User`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Address, NewAddress, NewUser, User, UserId};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, constraint_label, pool_error_message,
};
use super::models::{AddressRow, NewAddressRow, NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{addresses, users};

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(pool_error_message(error))
}

/// Map Diesel errors for writes that may collide on the email index.
fn map_write_error(error: diesel::result::Error, email: &str) -> UserPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation { .. } => UserPersistenceError::duplicate_email(email),
        other => map_failure(other),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_failure(classify_diesel_error(error))
}

fn map_failure(failure: DieselFailure) -> UserPersistenceError {
    match failure {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
        DieselFailure::UniqueViolation { constraint } => UserPersistenceError::query(format!(
            "unique violation on {}",
            constraint_label(constraint.as_deref())
        )),
        DieselFailure::ForeignKeyViolation { constraint } => UserPersistenceError::in_use(
            constraint_label(constraint.as_deref()).to_owned(),
        ),
    }
}

async fn load_addresses(
    conn: &mut AsyncPgConnection,
    user_ids: &[i64],
) -> Result<HashMap<i64, Vec<Address>>, UserPersistenceError> {
    let rows: Vec<AddressRow> = addresses::table
        .filter(addresses::user_id.eq_any(user_ids))
        .order(addresses::id.asc())
        .select(AddressRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut grouped: HashMap<i64, Vec<Address>> = HashMap::new();
    for row in rows {
        grouped.entry(row.user_id).or_default().push(row.into());
    }
    Ok(grouped)
}

async fn hydrate(
    conn: &mut AsyncPgConnection,
    row: UserRow,
) -> Result<User, UserPersistenceError> {
    let mut grouped = load_addresses(conn, &[row.id]).await?;
    let addresses = grouped.remove(&row.id).unwrap_or_default();
    Ok(row.into_user(addresses))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: UserRow = diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, &user.email))?;
        Ok(row.into_user(Vec::new()))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match row {
            Some(row) => hydrate(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match row {
            Some(row) => hydrate(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut grouped = load_addresses(&mut conn, &ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let addresses = grouped.remove(&row.id).unwrap_or_default();
                row.into_user(addresses)
            })
            .collect())
    }

    async fn save(&self, user: &User) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.find(user.id.get()))
            .set((UserUpdate::from(user), users::updated_at.eq(Utc::now())))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, &user.email))?;
        match row {
            Some(row) => hydrate(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn add_address(
        &self,
        user_id: UserId,
        address: &NewAddress,
    ) -> Result<Option<Address>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(addresses::table)
            .values(NewAddressRow::new(user_id, address))
            .returning(AddressRow::as_returning())
            .get_result::<AddressRow>(&mut conn)
            .await;
        match inserted {
            Ok(row) => Ok(Some(row.into())),
            Err(err) => match classify_diesel_error(err) {
                DieselFailure::ForeignKeyViolation { .. } => {
                    warn!(user_id = %user_id, "address insert for missing user");
                    Ok(None)
                }
                other => Err(map_failure(other)),
            },
        }
    }

    async fn remove_address(
        &self,
        user_id: UserId,
        address_id: i64,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            addresses::table
                .filter(addresses::id.eq(address_id))
                .filter(addresses::user_id.eq(user_id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Error-mapping coverage; queries run against a live database only.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, UserPersistenceError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn stray_unique_violation_is_a_query_error() {
        let err = map_failure(DieselFailure::UniqueViolation { constraint: None });
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn foreign_key_violation_marks_user_in_use() {
        let err = map_failure(DieselFailure::ForeignKeyViolation {
            constraint: Some("orders_user_id_fkey".to_owned()),
        });
        assert!(matches!(err, UserPersistenceError::InUse { .. }));
        assert!(err.to_string().contains("orders_user_id_fkey"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn row_conversion_collects_permissions() {
        let now = Utc::now();
        let row = UserRow {
            id: 3,
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "$argon2id$digest".to_owned(),
            role: "user".to_owned(),
            verified: true,
            permissions: vec!["view_reports".to_owned(), "manage_team".to_owned()],
            phone: String::new(),
            created_at: now,
            updated_at: now,
        };
        let user = row.into_user(Vec::new());
        assert_eq!(user.id, UserId::new(3));
        assert_eq!(user.permissions.len(), 2);
        assert_eq!(user.password.as_str(), "$argon2id$digest");
    }
}
