//! Server configuration, with TOML file support.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;
use crate::ServerError;

/// Configuration for a [`crate::Server`].
///
/// Can be loaded from a TOML file via [`ServerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). `Default` is assembled from
/// the same per-field helpers TOML deserialization uses, so "missing TOML
/// file" and "programmatic default" can never drift apart.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind the listening socket to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on. `0` requests an OS-chosen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Hard cap on a frame's payload size, in bytes. The wire-level
    /// constant is 10 MiB unless overridden here (Open Question #2).
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: u32,

    /// Budget for a single header or body read.
    #[serde(default = "default_read_timeout", with = "duration_secs")]
    pub read_timeout: Duration,

    /// Total budget for `shutdown()` to return, regardless of the number
    /// of in-flight workers.
    #[serde(default = "default_shutdown_timeout", with = "duration_secs")]
    pub shutdown_timeout: Duration,

    /// Log output format: human-readable or newline-delimited JSON.
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to construct and increment the Prometheus metrics registry.
    #[serde(default = "default_true")]
    pub enable_metrics: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    0
}

fn default_max_message_bytes() -> u32 {
    procd_types::DEFAULT_MAX_PAYLOAD_BYTES
}

fn default_read_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        value.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ServerError> {
        let content = std::fs::read_to_string(path).map_err(|e| ServerError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ServerError> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("ServerConfig is always serializable to TOML")
    }

    /// Parses `log_format` into a [`LogFormat`], defaulting to `Human` for
    /// anything that isn't recognized (matching the TOML-default string).
    pub fn log_format(&self) -> LogFormat {
        match self.log_format.as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Human,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_message_bytes: default_max_message_bytes(),
            read_timeout: default_read_timeout(),
            shutdown_timeout: default_shutdown_timeout(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_metrics: default_true(),
        }
    }
}
