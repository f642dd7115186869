// # HTTP IP Source
//
// This crate provides the public IP discovery used by the DDNS daemon.
//
// ## Architecture
//
// One GET against an address-echo service (e.g. api.ipify.org) per call.
// The service answers with the caller's address as plain text. Only an
// exact `200 OK` whose trimmed body parses as an IPv4 address is accepted;
// everything else is an error for the engine to log.
//
// No caching, no polling task, no retries: the engine calls `current()`
// once per iteration.

use async_trait::async_trait;
use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use std::net::Ipv4Addr;
use std::time::Duration;

use reqwest::StatusCode;

/// Longest response body kept in an error message
const MAX_ERROR_BODY: usize = 256;

/// Trimmed body, cut at `MAX_ERROR_BODY` bytes on a char boundary
fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }

    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

/// HTTP-based public IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "https://api.ipify.org")
    /// - `timeout`: Per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// The address-echo URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch current IP from HTTP service
    async fn fetch_ip(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;

        if status != StatusCode::OK {
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(Error::rate_limited(format!("{} answered {}", self.url, status)));
            }
            return Err(Error::http(status.as_u16(), excerpt(&body)));
        }

        let ip_text = body.trim();
        tracing::debug!("Address-echo service answered: {}", ip_text);

        ip_text
            .parse::<Ipv4Addr>()
            .map_err(|_| Error::invalid_input(format!("Not an IPv4 address: {:?}", ip_text)))
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.fetch_ip().await
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
