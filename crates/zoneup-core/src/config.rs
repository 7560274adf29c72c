//! Configuration model for the zoneup system
//!
//! The persisted document is a human-editable JSON file using the
//! camelCase key names operators already have on disk:
//!
//! ```json
//! {
//!   "schema": "v2",
//!   "credentials": { "key": "...", "secret": "..." },
//!   "domains": [
//!     { "name": "example.com",
//!       "records": [ { "name": "home", "type": "A" } ] }
//!   ],
//!   "ttl": 3600,
//!   "resetOnExit": true,
//!   "autoUpdate": { "enabled": true, "interval": 60 }
//! }
//! ```
//!
//! Fields this version does not know about survive a load/save cycle
//! untouched. Schema migration is not handled here: anything other
//! than the current `schema` tag is rejected at validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{Error, Result};

/// The only config schema this version operates on
pub const CURRENT_SCHEMA: &str = "v2";

/// TTL applied when the config carries none
pub const DEFAULT_TTL_SECS: u32 = 3600;

/// Lowest TTL the provider accepts
pub const MIN_TTL_SECS: u32 = 600;

/// Highest TTL worth sending (one week)
pub const MAX_TTL_SECS: u32 = 604_800;

/// Update interval applied when the config carries none (minutes)
pub const DEFAULT_INTERVAL_MINUTES: u64 = 60;

/// Shortest permitted update interval (minutes)
pub const MIN_INTERVAL_MINUTES: u64 = 5;

/// Longest permitted update interval (one day, minutes)
pub const MAX_INTERVAL_MINUTES: u64 = 1440;

/// Top-level persisted configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Schema version tag; must equal [`CURRENT_SCHEMA`]
    pub schema: String,

    /// API credentials for the DNS provider
    pub credentials: Credentials,

    /// Managed domains, processed in this order during a sweep
    #[serde(default)]
    pub domains: Vec<Domain>,

    /// Record TTL in seconds; clamped via [`Config::effective_ttl`] before use
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Revert all managed records to the sentinel address on graceful exit
    #[serde(default = "default_reset_on_exit")]
    pub reset_on_exit: bool,

    /// Recurring update schedule
    #[serde(default)]
    pub auto_update: AutoUpdate,

    /// Unknown fields, preserved verbatim across load/save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Config {
    /// TTL actually sent upstream: configured value clamped into the
    /// provider's accepted range.
    pub fn effective_ttl(&self) -> u32 {
        self.ttl.clamp(MIN_TTL_SECS, MAX_TTL_SECS)
    }

    /// Total number of managed records across all domains
    pub fn record_count(&self) -> usize {
        self.domains.iter().map(|d| d.records.len()).sum()
    }

    /// Check the parts every authenticated call depends on.
    ///
    /// An empty `domains` list is deliberately not rejected here; the
    /// engine reports that separately so the daemon can keep running
    /// while the operator fills the list in.
    pub fn validate(&self) -> Result<()> {
        if self.schema != CURRENT_SCHEMA {
            return Err(Error::config(format!(
                "unsupported config schema {:?} (expected {:?}); run the migration first",
                self.schema, CURRENT_SCHEMA
            )));
        }
        self.credentials.validate()
    }
}

impl Default for Config {
    /// Bootstrap sample written when no config file exists yet.
    /// The placeholder credentials fail validation until edited.
    fn default() -> Self {
        Self {
            schema: CURRENT_SCHEMA.to_string(),
            credentials: Credentials {
                key: "Paste your API key here".to_string(),
                secret: "Paste your API secret here".to_string(),
            },
            domains: Vec::new(),
            ttl: DEFAULT_TTL_SECS,
            reset_on_exit: true,
            auto_update: AutoUpdate::default(),
            extra: Map::new(),
        }
    }
}

/// Opaque bearer material for the DNS provider
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// API key
    pub key: String,
    /// API secret
    pub secret: String,
}

impl Credentials {
    /// Both halves must be non-empty and whitespace-free before any
    /// authenticated call. The bootstrap placeholders fail this check.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("key", &self.key), ("secret", &self.secret)] {
            if value.is_empty() {
                return Err(Error::config(format!("credentials.{field} is empty")));
            }
            if value.chars().any(char::is_whitespace) {
                return Err(Error::config(format!(
                    "credentials.{field} contains whitespace; did you edit the sample config?"
                )));
            }
        }
        Ok(())
    }
}

// Never expose key or secret through Debug formatting
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"<REDACTED>")
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

/// One managed zone and the records to keep updated inside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Zone name as known to the provider (e.g. the apex domain)
    pub name: String,

    /// Records updated during a sweep, in this order
    #[serde(default)]
    pub records: Vec<RecordSpec>,
}

/// One managed record within a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSpec {
    /// Subdomain label, or "@" for the apex
    pub name: String,

    /// Record type (currently always "A")
    #[serde(rename = "type", default = "default_record_type")]
    pub record_type: String,
}

impl RecordSpec {
    /// Convenience constructor for an A record
    pub fn a(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: default_record_type(),
        }
    }
}

/// Recurring update schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoUpdate {
    /// Whether the daemon keeps running after the first pass
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Minutes between passes; clamped via [`AutoUpdate::effective_interval`]
    #[serde(default = "default_interval")]
    pub interval: u64,
}

impl AutoUpdate {
    /// Interval actually armed: configured value clamped into
    /// `[MIN_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES]`.
    pub fn effective_interval(&self) -> u64 {
        self.interval.clamp(MIN_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES)
    }
}

impl Default for AutoUpdate {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: DEFAULT_INTERVAL_MINUTES,
        }
    }
}

fn default_ttl() -> u32 {
    DEFAULT_TTL_SECS
}

fn default_reset_on_exit() -> bool {
    true
}

fn default_record_type() -> String {
    "A".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_MINUTES
}
