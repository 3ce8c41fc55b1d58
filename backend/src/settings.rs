//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `INVENTORY_*` environment variables and
//! configuration files, in increasing order of precedence as OrthoConfig
//! defines it. Accessors apply defaults and validate; the raw fields stay
//! optional so a missing value is reported with a useful message.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::outbound::security::HashingParams;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = crate::outbound::persistence::DEFAULT_MAX_CONNECTIONS;

/// Settings that fail validation after loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("jwt_secret must be set (INVENTORY_JWT_SECRET)")]
    MissingJwtSecret,
    #[error("bind_addr `{value}` is not a socket address: {message}")]
    InvalidBindAddr { value: String, message: String },
}

/// Runtime configuration for the API server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INVENTORY")]
pub struct AppSettings {
    /// Listener address, `0.0.0.0:8080` when unset.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. In-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// HMAC secret for identity tokens. Required.
    pub jwt_secret: Option<String>,
    /// Argon2 memory cost in KiB.
    pub hash_memory_kib: Option<u32>,
    /// Argon2 time cost.
    pub hash_iterations: Option<u32>,
    /// Argon2 lanes.
    pub hash_parallelism: Option<u32>,
    /// Grace period for in-flight requests on shutdown.
    #[ortho_config(default = 5)]
    pub shutdown_timeout_secs: u64,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                message: err.to_string(),
            })
    }

    /// The configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Signing secret wrapped so it is wiped once the token service holds
    /// its own keys.
    pub fn jwt_secret(&self) -> Result<Zeroizing<String>, SettingsError> {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(|secret| Zeroizing::new(secret.to_owned()))
            .ok_or(SettingsError::MissingJwtSecret)
    }

    /// Argon2 work factor, falling back to the library defaults per field.
    pub fn hashing_params(&self) -> HashingParams {
        let defaults = HashingParams::default();
        HashingParams {
            memory_kib: self.hash_memory_kib.unwrap_or(defaults.memory_kib),
            iterations: self.hash_iterations.unwrap_or(defaults.iterations),
            parallelism: self.hash_parallelism.unwrap_or(defaults.parallelism),
        }
    }
}
