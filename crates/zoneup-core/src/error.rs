//! Error types for the zoneup system
//!
//! One taxonomy is shared by the configuration store, the IP resolver,
//! the provider client and the engine, so callers can tell "fix your
//! config" from "fix your API key" from "the provider is having an
//! outage" without downcasting.

use thiserror::Error;

/// Result type alias for zoneup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the zoneup system
#[derive(Error, Debug)]
pub enum Error {
    /// Config file missing or unparseable
    #[error("config unreadable: {0}")]
    ConfigUnreadable(String),

    /// Config file could not be written back
    #[error("config write failed: {0}")]
    ConfigWrite(String),

    /// Config is readable but cannot drive a sweep (no domains)
    #[error("config incomplete: {0}")]
    ConfigIncomplete(String),

    /// Other configuration problems (bad schema, bad credentials)
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level failure (connect, TLS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status from a remote service (5xx or the IP endpoint)
    #[error("upstream error (status {status}): {body}")]
    Upstream {
        /// HTTP status code returned by the remote service
        status: u16,
        /// Response body, kept for logs
        body: String,
    },

    /// Credentials rejected by the provider (401/403-class)
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Request rejected by the provider (other 4xx-class)
    #[error("validation error: {0}")]
    Validation(String),

    /// Domain or record not known to the provider (404-class)
    #[error("not found: {0}")]
    NotFound(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a "config unreadable" error
    pub fn config_unreadable(msg: impl Into<String>) -> Self {
        Self::ConfigUnreadable(msg.into())
    }

    /// Create a "config write failed" error
    pub fn config_write(msg: impl Into<String>) -> Self {
        Self::ConfigWrite(msg.into())
    }

    /// Create a "config incomplete" error
    pub fn config_incomplete(msg: impl Into<String>) -> Self {
        Self::ConfigIncomplete(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an upstream error from a status code and response body
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Whether this error means the credentials themselves are wrong.
    ///
    /// Every authenticated call would fail the same way, so a sweep
    /// stops early instead of burning one rejected request per record.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Config(err.to_string())
    }
}
