//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Discovering the public IP via IpSource
//! - Resolving the currently published record via RecordResolver
//! - Publishing via DnsProvider when the two disagree
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐      ┌────────────────┐      ┌─────────────┐
//! │  IpSource   │      │ RecordResolver │      │ DnsProvider │
//! │  (probe)    │      │ (current A)    │      │ (PUT)       │
//! └─────────────┘      └────────────────┘      └─────────────┘
//!        ▲                     ▲                      ▲
//!        └─────────────┬───────┴──────────────────────┘
//!                      │
//!               ┌──────────────┐       ┌──────────┐
//!               │ DdnsEngine   │──────▶│  Ticker  │
//!               └──────────────┘       └──────────┘
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Bootstrap** (once): probe, then publish unconditionally
//! 2. **Steady state** (forever): probe, resolve, publish on mismatch, pause
//!
//! Any collaborator failure is logged and ends the current iteration early.
//! Nothing escapes the loop, and nothing is remembered between iterations.

mod ticker;

pub use ticker::{FixedDelay, Ticker};

use std::future::Future;
use std::net::Ipv4Addr;

use tracing::{debug, error, info};

use crate::config::RecordConfig;
use crate::error::Error;
use crate::traits::{DnsProvider, IpSource, RecordResolver, UpdateResult};

/// What a single bootstrap or steady-state iteration did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The public IP could not be determined; nothing else was attempted
    ProbeFailed {
        error: Error,
    },

    /// The published record could not be resolved; no update was attempted
    ResolveFailed {
        public_ip: Ipv4Addr,
        error: Error,
    },

    /// The published record already matches the public IP
    InSync {
        ip: Ipv4Addr,
    },

    /// The provider accepted the new value
    Published {
        new_ip: Ipv4Addr,
        /// Resolved value before the update (`None` during bootstrap)
        previous_ip: Option<Ipv4Addr>,
    },

    /// Dry-run: the update was logged, not sent
    DryRun {
        new_ip: Ipv4Addr,
    },

    /// The provider rejected the update or could not be reached
    PublishFailed {
        new_ip: Ipv4Addr,
        error: Error,
    },
}

/// Core DDNS engine
///
/// The engine owns the three collaborators and the record they act on.
/// It runs everything sequentially on the calling task.
pub struct DdnsEngine {
    /// Public IP discovery
    ip_source: Box<dyn IpSource>,

    /// Lookup of the currently published value
    resolver: Box<dyn RecordResolver>,

    /// DNS provider for updating the record
    provider: Box<dyn DnsProvider>,

    /// The record kept in sync
    record: RecordConfig,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    pub fn new(
        ip_source: Box<dyn IpSource>,
        resolver: Box<dyn RecordResolver>,
        provider: Box<dyn DnsProvider>,
        record: RecordConfig,
    ) -> Self {
        Self {
            ip_source,
            resolver,
            provider,
            record,
        }
    }

    /// The record this engine manages
    pub fn record(&self) -> &RecordConfig {
        &self.record
    }

    /// Run the engine
    ///
    /// Performs the bootstrap publish, then loops forever: one
    /// [`sync_once`](Self::sync_once) followed by one `ticker.tick()`.
    ///
    /// `shutdown` is only observed while waiting on the ticker, so an
    /// in-flight iteration always completes. Pass
    /// `std::future::pending()` for a loop that never returns.
    pub async fn run<T, S>(&self, ticker: &mut T, shutdown: S)
    where
        T: Ticker + ?Sized,
        S: Future<Output = ()>,
    {
        info!(
            "Starting DDNS engine for {} via {} / {}",
            self.record,
            self.ip_source.source_name(),
            self.provider.provider_name()
        );

        self.bootstrap().await;

        tokio::pin!(shutdown);

        loop {
            self.sync_once().await;

            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown signal received, engine stopped");
                    break;
                }

                _ = ticker.tick() => {}
            }
        }
    }

    /// Bootstrap: probe once and publish the result unconditionally
    ///
    /// The published record is not consulted.
    pub async fn bootstrap(&self) -> SyncOutcome {
        let public_ip = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) => return self.probe_failed(e),
        };

        info!("Set current public IP: {} for {}", public_ip, self.record);
        self.publish(public_ip, None).await
    }

    /// One steady-state iteration: probe, resolve, publish on mismatch
    pub async fn sync_once(&self) -> SyncOutcome {
        let public_ip = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) => return self.probe_failed(e),
        };
        debug!("Public IP: {}", public_ip);

        let dns_ip = match self.resolver.resolve(&self.record).await {
            Ok(ip) => ip,
            Err(e) => {
                error!("Error resolving DNS for {}: {}", self.record, e);
                error!("Could not resolve DNS for {}", self.record);
                return SyncOutcome::ResolveFailed {
                    public_ip,
                    error: e,
                };
            }
        };
        info!("Current DNS IP for {} is {}", self.record, dns_ip);

        if public_ip == dns_ip {
            info!(
                "Public IP {} matches the DNS IP {}. No update needed.",
                public_ip, dns_ip
            );
            return SyncOutcome::InSync { ip: public_ip };
        }

        info!(
            "Public IP {} is different from DNS IP {}. Updating DNS record...",
            public_ip, dns_ip
        );
        self.publish(public_ip, Some(dns_ip)).await
    }

    fn probe_failed(&self, error: Error) -> SyncOutcome {
        error!(
            "Error getting public IP from {}: {}",
            self.ip_source.source_name(),
            error
        );
        error!("Could not retrieve public IP.");
        SyncOutcome::ProbeFailed { error }
    }

    /// Perform a single publish attempt; failures are logged, never returned
    async fn publish(&self, new_ip: Ipv4Addr, previous_ip: Option<Ipv4Addr>) -> SyncOutcome {
        match self.provider.update_record(&self.record, new_ip).await {
            Ok(UpdateResult::Updated { new_ip }) => {
                info!("DNS record for {} updated to {}", self.record, new_ip);
                SyncOutcome::Published {
                    new_ip,
                    previous_ip,
                }
            }
            Ok(UpdateResult::DryRun { new_ip }) => {
                info!("[DRY-RUN] DNS record for {} left unchanged", self.record);
                SyncOutcome::DryRun { new_ip }
            }
            Err(e) => {
                if e.is_transient() {
                    error!("Failed to update DNS record: {}", e);
                } else {
                    error!(
                        "Failed to update DNS record: {} (will keep failing until \
                        GANDI_API_KEY, DOMAIN and SUBDOMAIN are corrected)",
                        e
                    );
                }
                SyncOutcome::PublishFailed { new_ip, error: e }
            }
        }
    }
}
