//! Configuration types for the DDNS system
//!
//! All configuration comes from environment variables and is read once at
//! startup. The three record variables (`GANDI_API_KEY`, `DOMAIN`,
//! `SUBDOMAIN`) are passed through untouched: an empty or missing value is
//! not rejected here and only surfaces as a failure in whichever call first
//! needs it. The optional tuning variables are parsed strictly.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Address-echo service queried for the public IP
pub const DEFAULT_IP_SOURCE_URL: &str = "https://api.ipify.org";

/// LiveDNS API base URL
pub const DEFAULT_API_URL: &str = "https://api.gandi.net";

/// Pause after every steady-state iteration
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// TTL written with every record update
pub const DEFAULT_RECORD_TTL: u32 = 300;

/// Per-request HTTP timeout
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The A record kept in sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordConfig {
    /// Apex domain (e.g. "example.com")
    pub domain: String,

    /// Record label within the domain (e.g. "home")
    pub subdomain: String,

    /// TTL sent with every update
    pub ttl: u32,
}

impl RecordConfig {
    /// Create a new record configuration with the default TTL
    pub fn new(domain: impl Into<String>, subdomain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            subdomain: subdomain.into(),
            ttl: DEFAULT_RECORD_TTL,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// The name that is resolved and updated, `subdomain.domain`
    pub fn fqdn(&self) -> String {
        format!("{}.{}", self.subdomain, self.domain)
    }
}

impl fmt::Display for RecordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.subdomain, self.domain)
    }
}

/// Whether record updates are actually sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Send updates to the provider
    #[default]
    Live,
    /// Log the intended update without sending it
    DryRun,
}

impl FromStr for RunMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "live" => Ok(RunMode::Live),
            "dry-run" | "dry_run" | "dryrun" => Ok(RunMode::DryRun),
            other => Err(Error::config(format!(
                "DDNS_MODE '{}' is not valid. Valid modes: live, dry-run",
                other
            ))),
        }
    }
}

/// Main DDNS configuration
#[derive(Clone)]
pub struct DdnsConfig {
    /// LiveDNS bearer token
    /// ⚠️ NEVER log this value
    pub api_key: String,

    /// Record to keep in sync
    pub record: RecordConfig,

    /// Address-echo service URL
    pub ip_source_url: String,

    /// LiveDNS API base URL
    pub api_url: String,

    /// Pause between iterations (in seconds)
    pub poll_interval_secs: u64,

    /// HTTP request timeout (in seconds)
    pub http_timeout_secs: u64,

    /// Verify TLS certificates on the publish call
    pub tls_verify: bool,

    /// Live or dry-run
    pub mode: RunMode,

    /// tracing level name
    pub log_level: String,
}

// Custom Debug implementation that hides the API key
impl fmt::Debug for DdnsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DdnsConfig")
            .field("api_key", &"<REDACTED>")
            .field("record", &self.record)
            .field("ip_source_url", &self.ip_source_url)
            .field("api_url", &self.api_url)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("tls_verify", &self.tls_verify)
            .field("mode", &self.mode)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl DdnsConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// `lookup` returns the value of a variable, or `None` if unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ttl = parse_or(&lookup, "DDNS_RECORD_TTL", DEFAULT_RECORD_TTL)?;

        let config = Self {
            api_key: lookup("GANDI_API_KEY").unwrap_or_default(),
            record: RecordConfig::new(
                lookup("DOMAIN").unwrap_or_default(),
                lookup("SUBDOMAIN").unwrap_or_default(),
            )
            .with_ttl(ttl),
            ip_source_url: non_empty(&lookup, "DDNS_IP_SOURCE_URL")
                .unwrap_or_else(|| DEFAULT_IP_SOURCE_URL.to_string()),
            api_url: non_empty(&lookup, "GANDI_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            poll_interval_secs: parse_or(
                &lookup,
                "DDNS_POLL_INTERVAL_SECS",
                DEFAULT_POLL_INTERVAL_SECS,
            )?,
            http_timeout_secs: parse_or(
                &lookup,
                "DDNS_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?,
            tls_verify: match non_empty(&lookup, "DDNS_TLS_VERIFY") {
                Some(value) => parse_bool("DDNS_TLS_VERIFY", &value)?,
                None => true,
            },
            mode: match non_empty(&lookup, "DDNS_MODE") {
                Some(value) => value.parse()?,
                None => RunMode::Live,
            },
            log_level: non_empty(&lookup, "DDNS_LOG_LEVEL")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
                .to_lowercase(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the tuning settings
    ///
    /// The record variables are deliberately left unchecked.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(Error::config("DDNS_POLL_INTERVAL_SECS must be > 0"));
        }

        if self.http_timeout_secs == 0 {
            return Err(Error::config("DDNS_HTTP_TIMEOUT_SECS must be > 0"));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(Error::config(format!(
                    "DDNS_LOG_LEVEL '{}' is not valid. \
                    Valid levels: trace, debug, info, warn, error",
                    self.log_level
                )));
            }
        }

        for (key, url) in [
            ("DDNS_IP_SOURCE_URL", &self.ip_source_url),
            ("GANDI_API_URL", &self.api_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(Error::config(format!(
                    "{} must use HTTP or HTTPS scheme. Got: {}",
                    key, url
                )));
            }
        }

        Ok(())
    }

    /// Pause between iterations
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// HTTP request timeout
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match non_empty(lookup, key) {
        Some(value) => value
            .parse()
            .map_err(|_| Error::config(format!("{} is not a valid number. Got: {}", key, value))),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::config(format!(
            "{} must be a boolean (true/false). Got: {}",
            key, value
        ))),
    }
}
