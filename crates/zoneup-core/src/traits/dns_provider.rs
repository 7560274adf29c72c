// # DNS Provider Trait
//
// Defines the interface for reading and writing records via the
// provider's management API.
//
// ## Implementations
//
// - GoDaddy: `zoneup-provider-godaddy` crate
//
// ## Responsibility split
//
// Implementations are stateless, single-shot API clients. They
// classify HTTP failures into the shared error taxonomy and return;
// deciding whether a failure skips one record or ends the whole
// sweep is the engine's job, and scheduling retries is the timer's.
// Providers never cache, never sleep, and never spawn tasks.

use async_trait::async_trait;
use std::collections::HashSet;
use std::net::IpAddr;

use crate::config::RecordSpec;
use crate::error::Result;

/// One zone as reported by the provider's domain listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSummary {
    /// Zone name (apex domain)
    pub name: String,
}

/// Trait for DNS provider implementations
///
/// # Thread Safety
///
/// Implementations must be usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every zone visible to the configured credentials, in the
    /// order the provider returns them.
    async fn list_domains(&self) -> Result<Vec<DomainSummary>>;

    /// List the records of one type inside a zone.
    ///
    /// Implementations must de-duplicate the listing by record name
    /// before returning (first occurrence wins); callers can rely on
    /// unique names.
    async fn list_records(&self, domain: &str, record_type: &str) -> Result<Vec<RecordSpec>>;

    /// Replace one record's value and TTL in a single provider-side
    /// operation.
    ///
    /// # Idempotency
    ///
    /// Calling this twice with identical arguments must produce the
    /// same provider-side state as calling it once.
    async fn upsert_record(
        &self,
        domain: &str,
        record: &RecordSpec,
        data: IpAddr,
        ttl: u32,
    ) -> Result<()>;

    /// Provider identifier for logging (e.g. "godaddy")
    fn provider_name(&self) -> &'static str;
}

/// Drop records whose name was already seen, keeping the first
/// occurrence. Provider listings can repeat a name (one entry per
/// data value); downstream code expects names to be unique.
pub fn dedup_by_name(records: Vec<RecordSpec>) -> Vec<RecordSpec> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.name.clone()))
        .collect()
}
