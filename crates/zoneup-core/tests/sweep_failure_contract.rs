//! Contract tests: sweep failure semantics
//!
//! Verifies partial-failure tolerance (one broken record never stops
//! the others), idempotent repeat passes, and the one exception:
//! rejected credentials end the sweep early.

mod common;

use common::*;
use zoneup_core::config::{Domain, RecordSpec};
use zoneup_core::{Error, PassOutcome, Reconciler, SENTINEL_IP};

fn three_record_config() -> zoneup_core::Config {
    config_with(vec![Domain {
        name: "example.com".to_string(),
        records: vec![RecordSpec::a("a"), RecordSpec::a("b"), RecordSpec::a("c")],
    }])
}

#[tokio::test]
async fn record_failure_does_not_abort_the_sweep() {
    let resolver = StaticResolver::new(ip("1.2.3.4"));
    let provider = RecordingProvider::new();
    provider.fail_record("b", FailureMode::Upstream);

    let mut engine = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        &three_record_config(),
    );

    let outcome = engine.run_pass().await.unwrap();
    let PassOutcome::Swept(report) = outcome else {
        panic!("expected a sweep");
    };

    // All three records attempted despite the failure in the middle
    let attempted: Vec<_> = provider
        .upsert_calls()
        .into_iter()
        .map(|c| c.record)
        .collect();
    assert_eq!(attempted, vec!["a", "b", "c"]);

    assert_eq!(report.attempted, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].domain, "example.com");
    assert_eq!(report.failures[0].record, "b");
    assert!(matches!(report.failures[0].error, Error::Upstream { .. }));
}

#[tokio::test]
async fn partial_failure_still_adopts_the_new_ip() {
    // A chronically failing record must not force the sweep to repeat
    // every pass: the new address is adopted regardless.
    let resolver = StaticResolver::new(ip("1.2.3.4"));
    let provider = RecordingProvider::new();
    provider.fail_record("b", FailureMode::Upstream);

    let mut engine = Reconciler::new(
        Box::new(resolver.clone()),
        Box::new(provider.clone()),
        &three_record_config(),
    );

    engine.run_pass().await.unwrap();
    assert_eq!(engine.last_known_ip(), ip("1.2.3.4"));

    // Same IP next pass: no retry storm against the broken record
    let outcome = engine.run_pass().await.unwrap();
    assert!(matches!(outcome, PassOutcome::NoOp { .. }));
    assert_eq!(provider.upsert_count(), 3);
}

#[tokio::test]
async fn repeated_pass_with_unchanged_ip_adds_no_side_effects() {
    let resolver = StaticResolver::new(ip("1.2.3.4"));
    let provider = RecordingProvider::new();

    let mut engine = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        &three_record_config(),
    );

    engine.run_pass().await.unwrap();
    let calls_after_once = provider.upsert_calls();

    engine.run_pass().await.unwrap();
    let calls_after_twice = provider.upsert_calls();

    // Running the pass twice leaves the provider in the same state as
    // running it once
    assert_eq!(calls_after_once, calls_after_twice);
}

#[tokio::test]
async fn auth_failure_ends_the_sweep_and_fails_the_pass() {
    let resolver = StaticResolver::new(ip("1.2.3.4"));
    let provider = RecordingProvider::new();
    provider.fail_record("a", FailureMode::Auth);

    let mut engine = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        &three_record_config(),
    );

    let err = engine.run_pass().await.unwrap_err();
    assert!(err.is_auth(), "got {err}");

    // Only the first record was attempted; the rest were skipped
    assert_eq!(provider.upsert_count(), 1);

    // The pass failed, so the next one retries from scratch
    assert_eq!(engine.last_known_ip(), SENTINEL_IP);
}
