//! Test doubles and common utilities for engine contract tests
//!
//! The doubles count every call so tests can assert on exactly how
//! much network traffic a pass would have generated.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use zoneup_core::config::{Config, Credentials, Domain, RecordSpec};
use zoneup_core::error::{Error, Result};
use zoneup_core::traits::{DnsProvider, DomainSummary, IpResolver};

/// A resolver that returns a settable address and counts calls.
///
/// All state is behind `Arc`, so a clone handed to the engine shares
/// counters with the copy the test keeps for assertions.
#[derive(Clone)]
pub struct StaticResolver {
    ip: Arc<Mutex<IpAddr>>,
    fail: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl StaticResolver {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip: Arc::new(Mutex::new(ip)),
            fail: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Change the address the next resolve() returns
    pub fn set_ip(&self, ip: IpAddr) {
        *self.ip.lock().unwrap() = ip;
    }

    /// Make subsequent resolve() calls fail with a network error
    pub fn set_offline(&self, offline: bool) {
        self.fail.store(offline, Ordering::SeqCst);
    }

    /// Number of times resolve() was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpResolver for StaticResolver {
    async fn resolve(&self) -> Result<IpAddr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::network("resolver offline"));
        }
        Ok(*self.ip.lock().unwrap())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// One recorded upsert call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertCall {
    pub domain: String,
    pub record: String,
    pub record_type: String,
    pub data: IpAddr,
    pub ttl: u32,
}

/// How a scripted record failure should present itself
#[derive(Debug, Clone, Copy)]
pub enum FailureMode {
    /// Transient 5xx-class failure
    Upstream,
    /// 401/403-class credential rejection
    Auth,
}

/// A provider that records every upsert and can be scripted to fail
/// for specific record names.
#[derive(Clone, Default)]
pub struct RecordingProvider {
    calls: Arc<Mutex<Vec<UpsertCall>>>,
    failures: Arc<Mutex<HashMap<String, FailureMode>>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script upserts for `record_name` to fail
    pub fn fail_record(&self, record_name: &str, mode: FailureMode) {
        self.failures
            .lock()
            .unwrap()
            .insert(record_name.to_string(), mode);
    }

    /// Every upsert attempted so far, in call order
    pub fn upsert_calls(&self) -> Vec<UpsertCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of upserts attempted so far
    pub fn upsert_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl DnsProvider for RecordingProvider {
    async fn list_domains(&self) -> Result<Vec<DomainSummary>> {
        Ok(Vec::new())
    }

    async fn list_records(&self, _domain: &str, _record_type: &str) -> Result<Vec<RecordSpec>> {
        Ok(Vec::new())
    }

    async fn upsert_record(
        &self,
        domain: &str,
        record: &RecordSpec,
        data: IpAddr,
        ttl: u32,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(UpsertCall {
            domain: domain.to_string(),
            record: record.name.clone(),
            record_type: record.record_type.clone(),
            data,
            ttl,
        });

        match self.failures.lock().unwrap().get(&record.name) {
            Some(FailureMode::Upstream) => Err(Error::upstream(503, "provider down")),
            Some(FailureMode::Auth) => Err(Error::auth("credentials rejected")),
            None => Ok(()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// Config with valid test credentials and the given domains
pub fn config_with(domains: Vec<Domain>) -> Config {
    Config {
        credentials: Credentials {
            key: "test-key".to_string(),
            secret: "test-secret".to_string(),
        },
        domains,
        ..Config::default()
    }
}

/// Config managing one domain with one A record
pub fn single_record_config(domain: &str, record: &str) -> Config {
    config_with(vec![Domain {
        name: domain.to_string(),
        records: vec![RecordSpec::a(record)],
    }])
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("test IP literal")
}
