//! Application settings and the HTTP server configuration object.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use carematch::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 3600;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Settings that must be present before the server can start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A required setting was not supplied.
    #[error("missing required setting {name}")]
    Missing { name: &'static str },
    /// A setting was supplied with an unusable value.
    #[error("invalid setting {name}: {reason}")]
    Invalid {
        name: &'static str,
        reason: &'static str,
    },
}

/// Server settings loaded from CLI flags, `CAREMATCH_*` environment
/// variables, and an optional configuration file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CAREMATCH")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Bearer token lifetime in seconds.
    pub token_ttl_secs: Option<i64>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    /// Configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Configured database URL.
    ///
    /// # Errors
    /// Returns [`SettingsError::Missing`] when no URL was supplied.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::Missing {
                name: "database_url",
            })
    }

    /// Configured token signing secret.
    ///
    /// # Errors
    /// Returns [`SettingsError::Missing`] when no secret was supplied.
    pub fn jwt_secret(&self) -> Result<&str, SettingsError> {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .ok_or(SettingsError::Missing { name: "jwt_secret" })
    }

    /// Token lifetime, defaulting to one hour.
    ///
    /// # Errors
    /// Returns [`SettingsError::Invalid`] for a non-positive lifetime or one
    /// longer than 30 days.
    pub fn token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let secs = self.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        if secs <= 0 {
            return Err(SettingsError::Invalid {
                name: "token_ttl_secs",
                reason: "must be positive",
            });
        }
        if secs > MAX_TOKEN_TTL_SECS {
            return Err(SettingsError::Invalid {
                name: "token_ttl_secs",
                reason: "must not exceed 30 days",
            });
        }
        TimeDelta::try_seconds(secs).ok_or(SettingsError::Invalid {
            name: "token_ttl_secs",
            reason: "out of range",
        })
    }

    /// Pool size, defaulting to 10.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) jwt_secret: Vec<u8>,
    pub(crate) token_ttl: TimeDelta,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration from a pool and token settings.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, jwt_secret: &str, token_ttl: TimeDelta) -> Self {
        Self {
            bind_addr,
            db_pool,
            jwt_secret: jwt_secret.as_bytes().to_vec(),
            token_ttl,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
