//! Trait definitions for the zoneup system
//!
//! The engine only ever talks to the outside world through these two
//! seams, so contract tests can drive it with counting mocks.

pub mod dns_provider;
pub mod ip_resolver;

pub use dns_provider::{dedup_by_name, DnsProvider, DomainSummary};
pub use ip_resolver::IpResolver;
