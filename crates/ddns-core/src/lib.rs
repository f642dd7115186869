// # ddns-core
//
// Core library for the polling dynamic-DNS updater.
//
// ## Architecture Overview
//
// One record (`SUBDOMAIN.DOMAIN`) is kept pointing at the caller's public
// IPv4 address. The library provides:
// - **IpSource**: Trait for discovering the current public IP
// - **RecordResolver**: Trait for resolving the currently published A record
// - **DnsProvider**: Trait for replacing the A record via a provider API
// - **Ticker**: The pause between two iterations, injectable for tests
// - **DdnsEngine**: Bootstrap publish followed by the compare-and-publish loop
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Loop logic is separate from the HTTP and DNS plumbing
// 2. **Failure Isolation**: Every collaborator error is logged and skips the iteration
// 3. **Library-First**: The daemon is a thin wiring layer over this crate
// 4. **No Hidden State**: Nothing is cached between iterations

pub mod config;
pub mod engine;
pub mod error;
pub mod traits;

// Re-export core types for convenience
pub use config::{DdnsConfig, RecordConfig, RunMode};
pub use engine::{DdnsEngine, FixedDelay, SyncOutcome, Ticker};
pub use error::{Error, Result};
pub use traits::{DnsProvider, IpSource, RecordResolver, UpdateResult};
