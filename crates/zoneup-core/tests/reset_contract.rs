//! Contract tests: shutdown reset sweep
//!
//! The reset sweep reuses the per-record update path with the
//! sentinel address so a terminating host does not leave DNS pointing
//! at itself.

mod common;

use common::*;
use zoneup_core::config::{Domain, RecordSpec};
use zoneup_core::{Reconciler, SENTINEL_IP};

fn two_record_config() -> zoneup_core::Config {
    config_with(vec![Domain {
        name: "example.com".to_string(),
        records: vec![RecordSpec::a("home"), RecordSpec::a("vpn")],
    }])
}

#[tokio::test]
async fn reset_reverts_every_record_to_the_sentinel() {
    let resolver = StaticResolver::new(ip("1.2.3.4"));
    let provider = RecordingProvider::new();

    let mut engine = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        &two_record_config(),
    );

    // Normal operation first: records point at the real address
    engine.run_pass().await.unwrap();
    assert_eq!(provider.upsert_count(), 2);

    let report = engine.reset().await.unwrap();
    assert!(report.fully_succeeded());
    assert_eq!(report.target_ip, SENTINEL_IP);

    // Exactly two more upserts, both carrying the sentinel
    let calls = provider.upsert_calls();
    assert_eq!(calls.len(), 4);
    assert!(calls[2..].iter().all(|c| c.data == SENTINEL_IP));

    // Last known IP is left alone; the process is exiting anyway
    assert_eq!(engine.last_known_ip(), ip("1.2.3.4"));
}

#[tokio::test]
async fn reset_runs_regardless_of_last_known_ip() {
    // Even with no completed sweep (last known IP still the
    // sentinel), reset issues the upserts unconditionally.
    let resolver = StaticResolver::new(ip("1.2.3.4"));
    let provider = RecordingProvider::new();

    let engine = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        &two_record_config(),
    );

    let report = engine.reset().await.unwrap();
    assert_eq!(report.attempted, 2);
    assert_eq!(provider.upsert_count(), 2);
    assert!(provider.upsert_calls().iter().all(|c| c.data == SENTINEL_IP));
}

#[tokio::test]
async fn reset_tolerates_per_record_failures() {
    let resolver = StaticResolver::new(ip("1.2.3.4"));
    let provider = RecordingProvider::new();
    provider.fail_record("home", FailureMode::Upstream);

    let engine = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        &two_record_config(),
    );

    let report = engine.reset().await.unwrap();
    assert_eq!(report.attempted, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].record, "home");
}
