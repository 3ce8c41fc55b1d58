//! Shared PostgreSQL pool for the Diesel stores.
//!
//! [`DbPool::connect`] is the start-up entry point: it validates the sizing
//! taken from settings, builds the `bb8` pool and checks one connection out
//! so an unreachable database stops the process before it starts serving.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::info;

/// Pool size used when settings leave it unset.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool failures, mapped by each store onto its own port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The configured sizing cannot produce a usable pool.
    #[error("invalid pool configuration: {message}")]
    Config { message: String },

    /// The pool could not be constructed.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },

    /// No connection became available within the checkout timeout.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },
}

impl PoolError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }
}

/// Connection target and sizing for [`DbPool::connect`].
///
/// ```ignore
/// let config = PoolConfig::new(settings.database_url().unwrap_or_default())
///     .with_max_size(settings.db_max_connections());
/// let pool = DbPool::connect(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_CONNECTIONS,
            checkout_timeout: CHECKOUT_TIMEOUT,
        }
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    /// Reject sizing that `bb8` would accept but could never serve from.
    fn validate(&self) -> Result<(), PoolError> {
        if self.database_url.trim().is_empty() {
            return Err(PoolError::config("database_url is empty"));
        }
        if self.max_size == 0 {
            return Err(PoolError::config("db_max_connections must be at least 1"));
        }
        if self.checkout_timeout.is_zero() {
            return Err(PoolError::config("checkout timeout must be positive"));
        }
        Ok(())
    }
}

/// Cloneable handle shared by every Diesel store.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool and prove the database answers.
    ///
    /// # Errors
    ///
    /// [`PoolError::Config`] for unusable sizing, [`PoolError::Build`] when
    /// `bb8` refuses the configuration and [`PoolError::Checkout`] when the
    /// first connection cannot be opened.
    pub async fn connect(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        let pool = Self { inner };
        drop(pool.get().await?);
        info!(max_size = config.max_size, "database pool ready");
        Ok(pool)
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// [`PoolError::Checkout`] when none frees up within the timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
