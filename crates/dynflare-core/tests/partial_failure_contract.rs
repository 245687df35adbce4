//! Contract Test: Partial Failure
//!
//! Records written before a failure stay written; the baseline does not move.
//!
//! Constraints verified:
//! - Records are updated in configuration order
//! - The first failure stops the pass; later records are not attempted
//! - The baseline keeps the old IP after a partial update
//! - A baseline write failure after a full update is reported, and the next
//!   pass re-applies the same IP
//!
//! If this test fails, the baseline can claim an IP that some record lacks.

mod common;

use common::*;
use dynflare_core::traits::DnsRecord;
use dynflare_core::{Error, Outcome};

fn three_targets() -> Vec<DnsRecord> {
    let mut targets = two_targets();
    targets.push(DnsRecord::new("rec-mail", "A", "mail.example.com", "zone-1"));
    targets
}

#[tokio::test]
async fn second_record_rejected_keeps_old_baseline() {
    let resolver = ScriptedResolver::returning("2.2.2.2");
    let provider = RecordingProvider::new().fail_on("vpn.example.com", WriteFailure::Rejected);
    let store = CountingBaselineStore::holding("1.1.1.1");

    let outcome = reconciler(&resolver, &provider, &store)
        .reconcile(&two_targets(), false)
        .await;

    match outcome {
        Outcome::Failed(Error::UpdateFailed { target, applied, .. }) => {
            assert_eq!(target, "vpn.example.com");
            assert_eq!(applied, 1);
        }
        other => panic!("expected UpdateFailed, got {:?}", other),
    }

    // The first record really was written
    assert_eq!(
        provider.written_names(),
        vec!["home.example.com", "vpn.example.com"]
    );
    assert_eq!(provider.writes()[0].content, "2.2.2.2");

    assert_eq!(store.write_count(), 0);
    assert_eq!(store.stored_ip().as_deref(), Some("1.1.1.1"));
}

#[tokio::test]
async fn later_records_are_not_attempted() {
    let resolver = ScriptedResolver::returning("2.2.2.2");
    let provider = RecordingProvider::new().fail_on("vpn.example.com", WriteFailure::Status(500));
    let store = CountingBaselineStore::holding("1.1.1.1");

    let outcome = reconciler(&resolver, &provider, &store)
        .reconcile(&three_targets(), false)
        .await;

    assert!(outcome.is_failure());
    assert!(!provider.written_names().contains(&"mail.example.com".to_string()));
    assert_eq!(provider.write_count(), 2);
}

#[tokio::test]
async fn next_pass_rewrites_every_record() {
    let resolver = ScriptedResolver::returning("2.2.2.2");
    let provider = RecordingProvider::new().fail_on("vpn.example.com", WriteFailure::Rejected);
    let store = CountingBaselineStore::holding("1.1.1.1");
    let targets = three_targets();

    let engine = reconciler(&resolver, &provider, &store);
    engine.reconcile(&targets, false).await;

    provider.heal();
    let outcome = engine.reconcile(&targets, false).await;
    assert!(matches!(outcome, Outcome::Updated { .. }), "got {:?}", outcome);

    // First pass: home, vpn. Second pass: all three again.
    assert_eq!(
        provider.written_names(),
        vec![
            "home.example.com",
            "vpn.example.com",
            "home.example.com",
            "vpn.example.com",
            "mail.example.com",
        ]
    );
}

#[tokio::test]
async fn baseline_write_failure_is_reported_as_diverged() {
    let resolver = ScriptedResolver::returning("2.2.2.2");
    let provider = RecordingProvider::new();
    let store = CountingBaselineStore::holding("1.1.1.1").fail_writes();

    let outcome = reconciler(&resolver, &provider, &store)
        .reconcile(&two_targets(), false)
        .await;

    match outcome {
        Outcome::Failed(Error::BaselineDiverged { ip, updated, source }) => {
            assert_eq!(ip, "2.2.2.2");
            assert_eq!(updated, 2);
            assert!(matches!(*source, Error::BaselineWrite(_)));
        }
        other => panic!("expected BaselineDiverged, got {:?}", other),
    }

    assert_eq!(provider.write_count(), 2);
    assert_eq!(store.stored_ip().as_deref(), Some("1.1.1.1"));
}

#[tokio::test]
async fn diverged_baseline_is_repaired_by_next_pass() {
    let resolver = ScriptedResolver::returning("2.2.2.2");
    let provider = RecordingProvider::new();
    let store = CountingBaselineStore::holding("1.1.1.1").fail_writes();
    let targets = two_targets();

    let engine = reconciler(&resolver, &provider, &store);
    assert!(engine.reconcile(&targets, false).await.is_failure());

    store.repair();
    let outcome = engine.reconcile(&targets, false).await;

    assert!(matches!(outcome, Outcome::Updated { .. }), "got {:?}", outcome);
    // Same IP re-applied to every record
    assert_eq!(provider.write_count(), 4);
    assert_eq!(store.stored_ip().as_deref(), Some("2.2.2.2"));
}
