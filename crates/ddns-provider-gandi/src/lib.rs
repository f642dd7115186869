// # Gandi LiveDNS Provider
//
// This crate provides the Gandi LiveDNS provider for the DDNS system.
//
// ## Behavior
//
// - One HTTP request per update: a PUT that replaces the whole A rrset
// - Success is exactly `201 Created`; every other status is an error
// - Specific error mapping for HTTP status codes (401, 403, 404, 409, 429, 5xx)
// - Dry-run mode for safe testing
// - TLS verification is on unless explicitly disabled
// - ❌ NO retry, backoff or caching (the engine tries again next iteration)
// - ❌ NO comparison with the current value (owned by DdnsEngine)
//
// ## Security Requirements
//
// - API key NEVER appears in logs or `Debug` output
// - API key is read from the environment only
//
// ## API Reference
//
// - LiveDNS v5: https://api.gandi.net/docs/livedns/
// - Replace rrset: PUT `/v5/livedns/domains/:fqdn/records/:rrset_name/:rrset_type`

use async_trait::async_trait;
use ddns_core::traits::{DnsProvider, UpdateResult};
use ddns_core::{DdnsConfig, Error, RecordConfig, Result, RunMode};
use serde::Serialize;
use serde_json::Value;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of an rrset replacement
#[derive(Debug, Serialize)]
struct RrsetUpdate {
    rrset_values: Vec<String>,
    rrset_ttl: u32,
}

/// Transport options for [`LiveDnsProvider`]
#[derive(Debug, Clone, Copy)]
pub struct LiveDnsOptions {
    /// Per-request timeout
    pub timeout: Duration,

    /// Verify the server certificate
    pub tls_verify: bool,

    /// Log the request instead of sending it
    pub dry_run: bool,
}

impl Default for LiveDnsOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_HTTP_TIMEOUT,
            tls_verify: true,
            dry_run: false,
        }
    }
}

/// Gandi LiveDNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider logs the intended PUT URL and
/// payload and does **NOT** contact the API.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API key.
pub struct LiveDnsProvider {
    /// LiveDNS API key / personal access token
    /// ⚠️ NEVER log this value
    api_key: String,

    /// API base URL, without trailing slash
    api_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, skip the PUT
    dry_run: bool,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for LiveDnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveDnsProvider")
            .field("api_key", &"<REDACTED>")
            .field("api_url", &self.api_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl LiveDnsProvider {
    /// Create a new LiveDNS provider
    ///
    /// The API key is not validated: an empty or wrong key is reported by
    /// the API as an authentication failure on the first update.
    ///
    /// # Parameters
    ///
    /// - `api_key`: Bearer token with LiveDNS write permission
    /// - `api_url`: API base URL (e.g. "https://api.gandi.net")
    /// - `options`: Timeout, TLS and dry-run settings
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        options: LiveDnsOptions,
    ) -> Result<Self> {
        if !options.tls_verify {
            tracing::warn!(
                "TLS certificate verification is DISABLED for LiveDNS requests. \
                The API key can be intercepted by anyone on the path."
            );
        }

        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(!options.tls_verify)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client,
            dry_run: options.dry_run,
        })
    }

    /// Create a provider from the daemon configuration
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        if config.mode == RunMode::DryRun {
            tracing::warn!("LiveDNS provider running in DRY-RUN mode - no changes will be made");
        }

        Self::new(
            config.api_key.clone(),
            config.api_url.clone(),
            LiveDnsOptions {
                timeout: config.http_timeout(),
                tls_verify: config.tls_verify,
                dry_run: config.mode == RunMode::DryRun,
            },
        )
    }

    /// Whether updates are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// URL of the A rrset for `record`
    pub fn record_url(&self, record: &RecordConfig) -> String {
        format!(
            "{}/v5/livedns/domains/{}/records/{}/A",
            self.api_url, record.domain, record.subdomain
        )
    }

    /// Map a non-201 response to an error
    fn status_error(record: &RecordConfig, status: reqwest::StatusCode, body: String) -> Error {
        match status.as_u16() {
            401 | 403 => Error::auth(format!(
                "Invalid API key or insufficient permissions. Status: {} - {}",
                status, body
            )),
            404 => Error::not_found(format!(
                "Domain {} is not managed by this account. Status: {} - {}",
                record.domain, status, body
            )),
            409 => Error::provider(
                "gandi",
                format!("Conflict while updating {}: {} - {}", record, status, body),
            ),
            429 => Error::rate_limited(format!(
                "Rate limit exceeded. Please retry later. Status: {} - {}",
                status, body
            )),
            code => Error::http(code, body),
        }
    }
}

#[async_trait]
impl DnsProvider for LiveDnsProvider {
    /// Replace the A rrset of `record` with `new_ip`
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /v5/livedns/domains/example.com/records/home/A
    /// Authorization: Bearer <key>
    /// Content-Type: application/json
    ///
    /// {"rrset_values": ["198.51.100.9"], "rrset_ttl": 300}
    /// ```
    async fn update_record(&self, record: &RecordConfig, new_ip: Ipv4Addr) -> Result<UpdateResult> {
        let url = self.record_url(record);
        let payload = RrsetUpdate {
            rrset_values: vec![new_ip.to_string()],
            rrset_ttl: record.ttl,
        };

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                serde_json::to_string(&payload).unwrap_or_default()
            );
            return Ok(UpdateResult::DryRun { new_ip });
        }

        tracing::debug!("PUT {} ({} -> {})", url, record, new_ip);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());

        if status != reqwest::StatusCode::CREATED {
            return Err(Self::status_error(record, status, body));
        }

        // {"message": "DNS Record Created"}
        if let Ok(json) = serde_json::from_str::<Value>(&body) {
            if let Some(message) = json["message"].as_str() {
                tracing::debug!("LiveDNS: {}", message);
            }
        }

        Ok(UpdateResult::Updated { new_ip })
    }

    fn provider_name(&self) -> &'static str {
        "gandi"
    }
}
