// # zoneup-core
//
// Core library for the zoneup DNS reconciliation daemon.
//
// ## Architecture Overview
//
// - **ConfigStore / Config**: the persisted configuration document
//   (credentials, managed domains/records, timing options)
// - **IpResolver**: trait for discovering the current public IP
// - **DnsProvider**: trait for reading and writing records via the
//   provider's management API
// - **Reconciler**: the engine that compares the last known IP to
//   the current one and sweeps record updates when it changed
//
// The daemon binary (`zoneupd`) wires concrete resolver/provider
// implementations into the engine and drives it from a timer; this
// crate contains no HTTP code and no scheduling.

pub mod config;
pub mod engine;
pub mod error;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::{AutoUpdate, Config, Credentials, Domain, RecordSpec};
pub use engine::{PassOutcome, Reconciler, SweepFailure, SweepReport, SENTINEL_IP};
pub use error::{Error, Result};
pub use store::ConfigStore;
pub use traits::{DnsProvider, DomainSummary, IpResolver};
