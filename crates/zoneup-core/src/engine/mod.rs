//! Reconciliation engine
//!
//! The [`Reconciler`] decides whether an update sweep is needed and,
//! if so, executes it across every configured domain and record with
//! independent per-record outcomes.
//!
//! ## Pass flow
//!
//! ```text
//! run_pass()
//!   ├─ domains empty ──────────────► Err(ConfigIncomplete)
//!   ├─ resolve current IP fails ───► Err(..), last IP untouched
//!   ├─ IP == last known ───────────► Ok(NoOp), zero provider calls
//!   └─ IP changed ─────────────────► sweep every record in order,
//!                                    then adopt the new IP
//! ```
//!
//! The IP comparison short-circuits before any provider call; the
//! unchanged case is the common one and must stay free of API usage.
//!
//! ## Failure policy
//!
//! A single record failing does not stop the sweep: the failure is
//! logged with the offending domain/record and collected in the
//! [`SweepReport`], and the next record is attempted. The one
//! exception is an authentication failure, which ends the sweep and
//! fails the pass, since every remaining call would be rejected the
//! same way.
//!
//! After a completed sweep the new IP is adopted even if some records
//! failed; otherwise one chronically broken record would force the
//! whole sweep to repeat every pass against records that are already
//! correct. The log output distinguishes the two cases.

use std::net::{IpAddr, Ipv4Addr};
use tracing::{debug, info, warn};

use crate::config::{Config, Domain};
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, IpResolver};

/// Placeholder address: "no address known" at startup, and the value
/// records are reverted to by a reset sweep. Never a real address.
pub const SENTINEL_IP: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Outcome of one reconciliation pass
#[derive(Debug)]
pub enum PassOutcome {
    /// Resolved IP matched the last known one; nothing was done
    NoOp {
        /// The (unchanged) current address
        current_ip: IpAddr,
    },

    /// The IP changed and a sweep ran
    Swept(SweepReport),
}

/// What one sweep attempted and how it went
#[derive(Debug)]
pub struct SweepReport {
    /// Address every record was set to
    pub target_ip: IpAddr,

    /// Number of upsert calls issued
    pub attempted: usize,

    /// Per-record failures, in sweep order
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    fn new(target_ip: IpAddr) -> Self {
        Self {
            target_ip,
            attempted: 0,
            failures: Vec::new(),
        }
    }

    /// True when every attempted record succeeded
    pub fn fully_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One record that could not be updated during a sweep
#[derive(Debug)]
pub struct SweepFailure {
    /// Zone the record belongs to
    pub domain: String,
    /// Record name
    pub record: String,
    /// Why the upsert failed
    pub error: Error,
}

/// The reconciliation engine.
///
/// Owns the last-known-IP state (runtime only, never persisted) plus
/// a snapshot of the managed domains and the clamped TTL taken at
/// construction. Config mutation while a `Reconciler` exists is not a
/// supported flow; setup finishes before one is built.
pub struct Reconciler {
    resolver: Box<dyn IpResolver>,
    provider: Box<dyn DnsProvider>,
    domains: Vec<Domain>,
    ttl: u32,
    last_ip: IpAddr,
}

impl Reconciler {
    /// Build an engine over the given resolver and provider, reading
    /// `domains` and the effective TTL from the config.
    pub fn new(
        resolver: Box<dyn IpResolver>,
        provider: Box<dyn DnsProvider>,
        config: &Config,
    ) -> Self {
        Self {
            resolver,
            provider,
            domains: config.domains.clone(),
            ttl: config.effective_ttl(),
            last_ip: SENTINEL_IP,
        }
    }

    /// The address adopted by the most recent completed sweep, or
    /// [`SENTINEL_IP`] if no sweep has completed yet.
    pub fn last_known_ip(&self) -> IpAddr {
        self.last_ip
    }

    /// Run one reconciliation pass: resolve the current IP, compare,
    /// and sweep if it changed.
    pub async fn run_pass(&mut self) -> Result<PassOutcome> {
        if self.domains.is_empty() {
            return Err(Error::config_incomplete(
                "no domains configured; run setup or edit the config file",
            ));
        }

        let current_ip = self.resolver.resolve().await?;

        if current_ip == self.last_ip {
            debug!(ip = %current_ip, "address unchanged, skipping sweep");
            return Ok(PassOutcome::NoOp { current_ip });
        }

        info!(
            previous = %self.last_ip,
            current = %current_ip,
            "address changed, updating records"
        );

        let report = self.sweep(current_ip).await?;

        // Adopted even on partial failure; see module docs.
        self.last_ip = current_ip;

        if report.fully_succeeded() {
            info!(
                ip = %current_ip,
                records = report.attempted,
                "all records updated"
            );
        } else {
            warn!(
                ip = %current_ip,
                records = report.attempted,
                failed = report.failures.len(),
                "sweep completed with failures"
            );
        }

        Ok(PassOutcome::Swept(report))
    }

    /// Revert every managed record to [`SENTINEL_IP`].
    ///
    /// Used at shutdown so stale records do not keep pointing at a
    /// host that is going away. Runs unconditionally regardless of
    /// the last known IP, and leaves it untouched: the process is
    /// exiting.
    pub async fn reset(&self) -> Result<SweepReport> {
        info!("reverting all managed records to {}", SENTINEL_IP);
        self.sweep(SENTINEL_IP).await
    }

    /// Update every configured record to `target_ip`, domains and
    /// records in configured order, collecting per-record failures.
    async fn sweep(&self, target_ip: IpAddr) -> Result<SweepReport> {
        let mut report = SweepReport::new(target_ip);

        for domain in &self.domains {
            for record in &domain.records {
                report.attempted += 1;

                match self
                    .provider
                    .upsert_record(&domain.name, record, target_ip, self.ttl)
                    .await
                {
                    Ok(()) => {
                        debug!(
                            domain = %domain.name,
                            record = %record.name,
                            ip = %target_ip,
                            "record updated"
                        );
                    }
                    Err(e) if e.is_auth() => {
                        // Credentials are wrong for every call, not
                        // just this record. Stop here.
                        warn!(
                            domain = %domain.name,
                            record = %record.name,
                            "authentication rejected, ending sweep"
                        );
                        return Err(e);
                    }
                    Err(e) => {
                        warn!(
                            domain = %domain.name,
                            record = %record.name,
                            error = %e,
                            "record update failed, continuing"
                        );
                        report.failures.push(SweepFailure {
                            domain: domain.name.clone(),
                            record: record.name.clone(),
                            error: e,
                        });
                    }
                }
            }
        }

        Ok(report)
    }
}
