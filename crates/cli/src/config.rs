//! Configuration file for the `rdispatch` binary.
//!
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0:8080"
//! default_deadline = "10s"
//! max_body_bytes = 4194304
//!
//! [client]
//! request_timeout = "30s"
//!
//! [telemetry]
//! log_format = "json"
//! filter = "info,http_adapter=debug"
//! otlp_endpoint = "http://localhost:4317"
//! ```
//!
//! Every table and field is optional.

use std::path::Path;

use anyhow::Context as _;
use http_adapter::{ClientConfig, ServerConfig};
use serde::Deserialize;

use crate::telemetry::TelemetryConfig;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub telemetry: TelemetryConfig,
}

impl FileConfig {
    /// Loads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.server.validate()?;
        Ok(config)
    }
}
