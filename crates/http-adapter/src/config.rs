//! Server and client adapter configuration.
//!
//! Both types deserialize from a TOML/JSON table with every field optional;
//! durations are written as duration strings (`"10s"`, `"500ms"`).

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use crate::duration::serde_duration;
use crate::ConfigError;

/// Default listen address for the server adapter.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Default cap on an inbound request body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Settings for [`crate::RemoteDispatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub bind_addr: SocketAddr,

    /// Deadline applied to Call requests that carry none.
    #[serde(deserialize_with = "serde_duration::deserialize")]
    pub default_deadline: Duration,

    /// Largest inbound body accepted; larger bodies are rejected with 400.
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Checks invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_deadline.is_zero() {
            return Err(ConfigError::Invalid {
                message: "server.default_deadline must be greater than zero".to_owned(),
            });
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_bytes must be greater than zero".to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            default_deadline: dispatch::DEFAULT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Settings for the default [`crate::ReqwestTransport`].
///
/// Unset values leave the HTTP client's own defaults in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Total time allowed for one outbound exchange.
    #[serde(deserialize_with = "serde_duration::option::deserialize")]
    pub request_timeout: Option<Duration>,

    /// Time allowed to establish a connection.
    #[serde(deserialize_with = "serde_duration::option::deserialize")]
    pub connect_timeout: Option<Duration>,
}
