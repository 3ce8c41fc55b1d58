//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use inventory_backend::outbound::persistence::DbPool;
use inventory_backend::outbound::security::HashingParams;
use zeroize::Zeroizing;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: Zeroizing<String>,
    pub(crate) hashing: HashingParams,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Construct a configuration backed by in-memory stores.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt_secret: Zeroizing<String>) -> Self {
        Self {
            bind_addr,
            jwt_secret,
            hashing: HashingParams::default(),
            db_pool: None,
            shutdown_timeout: Duration::from_secs(5),
        }
    }

    /// Attach a database connection pool; every store switches to Diesel.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_hashing(mut self, hashing: HashingParams) -> Self {
        self.hashing = hashing;
        self
    }

    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}
