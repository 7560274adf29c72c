// # IP Resolver Trait
//
// Defines the interface for discovering the caller's current public
// IP address.
//
// ## Implementations
//
// - HTTP echo services (ipify and friends): `zoneup-ip-http` crate

use async_trait::async_trait;
use std::net::IpAddr;

use crate::error::Result;

/// Trait for public-IP resolver implementations
///
/// Implementations perform exactly one outbound request per call:
/// no caching, no internal retry. Retry policy belongs to whoever
/// schedules reconciliation passes, not to the resolver.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Fetch the current external IP address.
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: the address the outside world sees
    /// - `Err(Error::Network)`: transport failure
    /// - `Err(Error::Upstream)`: non-success HTTP status
    /// - `Err(Error::Validation)`: response body was not an IP literal
    async fn resolve(&self) -> Result<IpAddr>;

    /// Short identifier for logging (e.g. "http")
    fn source_name(&self) -> &'static str;
}
