//! Test doubles and common utilities for engine contract tests
//!
//! Every double is `Clone` and shares its counters between clones, so a
//! test can hand one copy to the engine and keep another for assertions.

#![allow(dead_code)]

use async_trait::async_trait;
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, IpSource, RecordResolver, UpdateResult};
use ddns_core::{RecordConfig, Ticker};
use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// The record used across the contract tests
pub fn home_record() -> RecordConfig {
    RecordConfig::new("example.com", "home")
}

/// Queue of canned answers; the last answer repeats once the queue is drained
#[derive(Clone)]
struct Script<T: Clone> {
    answers: Arc<Mutex<VecDeque<T>>>,
    last: Arc<Mutex<Option<T>>>,
    calls: Arc<AtomicUsize>,
}

impl<T: Clone> Script<T> {
    fn new(answers: Vec<T>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into())),
            last: Arc::new(Mutex::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn next(&self) -> T {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut answers = self.answers.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(answer) = answers.pop_front() {
            *last = Some(answer.clone());
        }
        last.clone().expect("script has at least one answer")
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// An IpSource that replays scripted answers
#[derive(Clone)]
pub struct ScriptedIpSource {
    script: Script<Result<Ipv4Addr>>,
}

impl ScriptedIpSource {
    pub fn new(answers: Vec<Result<Ipv4Addr>>) -> Self {
        Self {
            script: Script::new(answers),
        }
    }

    /// Always answer with the same address
    pub fn fixed(ip: Ipv4Addr) -> Self {
        Self::new(vec![Ok(ip)])
    }

    /// Always fail
    pub fn failing() -> Self {
        Self::new(vec![Err(Error::network("connection refused"))])
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.script.calls()
    }
}

#[async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.script.next()
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A RecordResolver that replays scripted answers and records the names asked
#[derive(Clone)]
pub struct ScriptedResolver {
    script: Script<Result<Ipv4Addr>>,
    names: Arc<Mutex<Vec<String>>>,
}

impl ScriptedResolver {
    pub fn new(answers: Vec<Result<Ipv4Addr>>) -> Self {
        Self {
            script: Script::new(answers),
            names: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn fixed(ip: Ipv4Addr) -> Self {
        Self::new(vec![Ok(ip)])
    }

    /// Always answer NXDOMAIN
    pub fn nxdomain() -> Self {
        Self::new(vec![Err(Error::resolve("NXDOMAIN"))])
    }

    /// Get the number of times resolve() was called
    pub fn call_count(&self) -> usize {
        self.script.calls()
    }

    /// Names passed to resolve(), in order
    pub fn resolved_names(&self) -> Vec<String> {
        self.names.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordResolver for ScriptedResolver {
    async fn resolve(&self, record: &RecordConfig) -> Result<Ipv4Addr> {
        self.names.lock().unwrap().push(record.fqdn());
        self.script.next()
    }
}

/// A mock DnsProvider that tracks calls
#[derive(Clone)]
pub struct MockDnsProvider {
    /// Addresses passed to update_record(), in order
    published: Arc<Mutex<Vec<(RecordConfig, Ipv4Addr)>>>,
    /// Error to return instead of succeeding
    failure: Option<Error>,
    dry_run: bool,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            published: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            dry_run: false,
        }
    }

    /// A provider that rejects every update with `error`
    pub fn failing_with(error: Error) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    /// A provider that reports dry-run results
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::new()
        }
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }

    /// Addresses passed to update_record(), in order
    pub fn published_ips(&self) -> Vec<Ipv4Addr> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|(_, ip)| *ip)
            .collect()
    }

    /// Records passed to update_record(), in order
    pub fn published_records(&self) -> Vec<RecordConfig> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|(record, _)| record.clone())
            .collect()
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    async fn update_record(&self, record: &RecordConfig, new_ip: Ipv4Addr) -> Result<UpdateResult> {
        self.published
            .lock()
            .unwrap()
            .push((record.clone(), new_ip));

        if let Some(ref error) = self.failure {
            return Err(error.clone());
        }

        if self.dry_run {
            Ok(UpdateResult::DryRun { new_ip })
        } else {
            Ok(UpdateResult::Updated { new_ip })
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A ticker that returns immediately and fires a shutdown after N ticks
///
/// After the final tick it never completes, so the engine's pending
/// shutdown wins the race deterministically.
pub struct SteppingTicker {
    ticks: Arc<AtomicUsize>,
    stop_after: usize,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl SteppingTicker {
    /// Returns the ticker and the shutdown receiver to pass to `run`
    pub fn new(stop_after: usize) -> (Self, oneshot::Receiver<()>) {
        let (stop_tx, stop_rx) = oneshot::channel();
        let ticker = Self {
            ticks: Arc::new(AtomicUsize::new(0)),
            stop_after,
            stop_tx: Some(stop_tx),
        };
        (ticker, stop_rx)
    }

    /// Get the number of ticks so far
    pub fn tick_count(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Ticker for SteppingTicker {
    async fn tick(&mut self) {
        let count = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        if count >= self.stop_after {
            if let Some(tx) = self.stop_tx.take() {
                let _ = tx.send(());
            }
            std::future::pending::<()>().await;
        }
    }
}

/// Shutdown future built from a oneshot receiver
pub async fn shutdown_on(rx: oneshot::Receiver<()>) {
    let _ = rx.await;
}
