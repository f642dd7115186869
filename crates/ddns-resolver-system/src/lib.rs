// # System Resolver
//
// Looks up the currently published A record through the operating system
// resolver (`getaddrinfo`, run on tokio's blocking pool). This honours
// /etc/hosts, nsswitch and whatever caching the host already does, exactly
// like any other program on the machine.
//
// The answer is what a client on this host would see, which is not
// necessarily what the provider holds right now: TTLs and negative caching
// apply.

use async_trait::async_trait;
use ddns_core::traits::RecordResolver;
use ddns_core::{Error, RecordConfig, Result};

use std::net::{IpAddr, Ipv4Addr};

/// Resolver backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    /// Create a new system resolver
    pub fn new() -> Self {
        Self
    }

    /// Resolve an arbitrary name to its first IPv4 address
    pub async fn resolve_name(&self, name: &str) -> Result<Ipv4Addr> {
        // getaddrinfo wants a service; the port is ignored
        let addrs = tokio::net::lookup_host((name, 0))
            .await
            .map_err(|e| Error::resolve(format!("{}: {}", name, e)))?;

        let first_v4 = addrs
            .map(|addr| addr.ip())
            .find_map(|ip| match ip {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            });

        match first_v4 {
            Some(ip) => {
                tracing::debug!("{} resolved to {}", name, ip);
                Ok(ip)
            }
            None => Err(Error::not_found(format!("No IPv4 address for {}", name))),
        }
    }
}

#[async_trait]
impl RecordResolver for SystemResolver {
    async fn resolve(&self, record: &RecordConfig) -> Result<Ipv4Addr> {
        self.resolve_name(&record.fqdn()).await
    }
}
