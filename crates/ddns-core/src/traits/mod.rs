//! Core traits for the DDNS system
//!
//! This module defines the three collaborators the engine drives.
//!
//! - [`IpSource`]: Discover the current public IP
//! - [`RecordResolver`]: Resolve the currently published A record
//! - [`DnsProvider`]: Replace the A record via a provider API

pub mod dns_provider;
pub mod ip_source;
pub mod record_resolver;

pub use dns_provider::{DnsProvider, UpdateResult};
pub use ip_source::IpSource;
pub use record_resolver::RecordResolver;
