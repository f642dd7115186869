//! Error types for the DDNS system
//!
//! Failures are classified so that the logs can tell a flaky network apart
//! from a bad API key. See [`Error::is_transient`].

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS system
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// DNS resolution errors (timeouts, SERVFAIL, malformed names)
    #[error("DNS resolution error: {0}")]
    Resolve(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failures (connect, TLS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Unexpected HTTP status
    #[error("HTTP error {status}: {body}")]
    Http {
        /// Status code returned by the server
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Record or name not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a DNS resolution error
    pub fn resolve(msg: impl Into<String>) -> Self {
        Self::Resolve(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an HTTP status error
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether the next iteration has a reasonable chance of succeeding
    /// without operator intervention.
    ///
    /// Authentication failures, missing records and bad input are permanent:
    /// they repeat every iteration until the configuration is fixed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Network(_)
            | Error::RateLimited(_)
            | Error::Resolve(_)
            | Error::Provider { .. } => true,
            Error::Http { status, .. } => *status >= 500,
            Error::Config(_)
            | Error::Authentication(_)
            | Error::NotFound(_)
            | Error::InvalidInput(_) => false,
        }
    }
}
