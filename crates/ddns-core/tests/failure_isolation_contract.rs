//! Contract Test: Failure Isolation
//!
//! Constraints verified:
//! - A failed probe skips resolution and publishing
//! - A failed resolution skips publishing
//! - A failed publish is reported, not propagated, and not retried
//! - Failures are written to the injected log sink
//!
//! If this test fails, an error is escaping the iteration or triggering
//! extra work.

mod common;

use common::*;
use ddns_core::error::Error;
use ddns_core::{DdnsEngine, SyncOutcome};
use std::io;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use tracing::instrument::WithSubscriber;

#[tokio::test]
async fn probe_failure_skips_resolve_and_publish() {
    let resolver = ScriptedResolver::fixed(Ipv4Addr::new(192, 0, 2, 1));
    let provider = MockDnsProvider::new();

    let engine = DdnsEngine::new(
        Box::new(ScriptedIpSource::failing()),
        Box::new(resolver.clone()),
        Box::new(provider.clone()),
        home_record(),
    );

    let outcome = engine.sync_once().await;

    assert!(matches!(
        outcome,
        SyncOutcome::ProbeFailed {
            error: Error::Network(_)
        }
    ));
    assert_eq!(resolver.call_count(), 0, "Resolver must not run");
    assert_eq!(provider.update_call_count(), 0, "Provider must not run");
}

#[tokio::test]
async fn resolve_failure_skips_publish() {
    let public_ip = Ipv4Addr::new(192, 0, 2, 10);
    let provider = MockDnsProvider::new();

    let engine = DdnsEngine::new(
        Box::new(ScriptedIpSource::fixed(public_ip)),
        Box::new(ScriptedResolver::nxdomain()),
        Box::new(provider.clone()),
        home_record(),
    );

    let outcome = engine.sync_once().await;

    assert_eq!(
        outcome,
        SyncOutcome::ResolveFailed {
            public_ip,
            error: Error::resolve("NXDOMAIN"),
        }
    );
    assert_eq!(provider.update_call_count(), 0);
}

#[tokio::test]
async fn publish_failure_is_reported_once() {
    let public_ip = Ipv4Addr::new(192, 0, 2, 10);
    let provider = MockDnsProvider::failing_with(Error::auth("invalid token"));

    let engine = DdnsEngine::new(
        Box::new(ScriptedIpSource::fixed(public_ip)),
        Box::new(ScriptedResolver::fixed(Ipv4Addr::new(192, 0, 2, 1))),
        Box::new(provider.clone()),
        home_record(),
    );

    let outcome = engine.sync_once().await;

    assert_eq!(
        outcome,
        SyncOutcome::PublishFailed {
            new_ip: public_ip,
            error: Error::auth("invalid token"),
        }
    );
    assert_eq!(provider.update_call_count(), 1, "No retry within an iteration");
}

#[tokio::test]
async fn loop_survives_every_failure_kind() {
    let public_ip = Ipv4Addr::new(192, 0, 2, 10);
    let provider = MockDnsProvider::failing_with(Error::http(500, "boom"));

    let ip_source = ScriptedIpSource::new(vec![
        Ok(public_ip),                        // bootstrap
        Err(Error::network("timed out")),     // iteration 1
        Ok(public_ip),                        // iteration 2: resolve fails
        Ok(public_ip),                        // iteration 3: publish fails
    ]);
    let resolver = ScriptedResolver::new(vec![
        Err(Error::resolve("SERVFAIL")),
        Ok(Ipv4Addr::new(192, 0, 2, 1)),
    ]);

    let engine = DdnsEngine::new(
        Box::new(ip_source.clone()),
        Box::new(resolver.clone()),
        Box::new(provider.clone()),
        home_record(),
    );

    let (mut ticker, stop_rx) = SteppingTicker::new(3);
    engine.run(&mut ticker, shutdown_on(stop_rx)).await;

    assert_eq!(ip_source.call_count(), 4);
    assert_eq!(resolver.call_count(), 2);
    // bootstrap + iteration 3
    assert_eq!(provider.update_call_count(), 2);
    assert_eq!(ticker.tick_count(), 3);
}

/// In-memory log sink
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[tokio::test]
async fn failures_are_logged_to_injected_sink() {
    let sink = Captured::default();
    let writer = sink.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_target(false)
        .finish();

    let engine = DdnsEngine::new(
        Box::new(ScriptedIpSource::failing()),
        Box::new(ScriptedResolver::nxdomain()),
        Box::new(MockDnsProvider::new()),
        home_record(),
    );

    engine.sync_once().with_subscriber(subscriber).await;

    let logs = sink.contents();
    assert!(logs.contains("ERROR"), "logs: {}", logs);
    assert!(logs.contains("connection refused"), "logs: {}", logs);
    assert!(logs.contains("Could not retrieve public IP."), "logs: {}", logs);
}
