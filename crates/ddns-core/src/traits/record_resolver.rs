// # Record Resolver Trait
//
// Defines the interface for looking up the A record currently published
// for the managed name.

use async_trait::async_trait;
use std::net::Ipv4Addr;

use crate::config::RecordConfig;

/// Trait for forward DNS lookups of the managed record
///
/// # Contract
///
/// - Resolves `record.fqdn()` (i.e. `subdomain.domain`)
/// - Returns the first IPv4 address of the answer
/// - No caching between calls and no retry logic
#[async_trait]
pub trait RecordResolver: Send + Sync {
    /// Resolve the currently published address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: The first IPv4 address the name resolves to
    /// - `Err(Error::NotFound)`: The name exists but has no IPv4 address
    /// - `Err(Error)`: Resolution failed (NXDOMAIN, timeout, malformed name)
    async fn resolve(&self, record: &RecordConfig) -> Result<Ipv4Addr, crate::Error>;
}
