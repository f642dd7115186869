// # DNS Provider Trait
//
// Defines the interface for replacing the managed A record via a provider API.
//
// ## Implementations
//
// - Gandi LiveDNS: `ddns-provider-gandi` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, RecordConfig};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//     let record = RecordConfig::new("example.com", "home");
//
//     provider.update_record(&record, [198, 51, 100, 9].into()).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

use crate::config::RecordConfig;

/// Result of a DNS update operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    /// The provider accepted the new value
    Updated {
        /// The address now published
        new_ip: Ipv4Addr,
    },
    /// Dry-run mode: the request was logged, not sent
    DryRun {
        /// The address that would have been published
        new_ip: Ipv4Addr,
    },
}

/// Trait for DNS provider implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Contract
///
/// Providers are single-shot and stateless:
/// - ✅ Perform one API call per invocation to their endpoint
/// - ✅ Map provider responses to a typed [`crate::Error`]
/// - ❌ Retry or back off (the engine waits for the next iteration)
/// - ❌ Decide whether an update is needed (owned by `DdnsEngine`)
/// - ❌ Log the API credential, ever
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Replace the record's value with `new_ip`
    ///
    /// The update is unconditional: the provider does not compare against
    /// the current value first.
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateResult)`: The result of the update operation
    /// - `Err(Error)`: If the update failed
    async fn update_record(
        &self,
        record: &RecordConfig,
        new_ip: Ipv4Addr,
    ) -> Result<UpdateResult, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
