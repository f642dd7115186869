// # ddnsd - DDNS Daemon
//
// Thin integration layer: everything that decides WHEN to publish lives
// in ddns-core. This binary only
// 1. reads configuration from environment variables
// 2. initializes logging and the runtime
// 3. builds the IP source, resolver and LiveDNS provider
// 4. runs the engine until SIGTERM/SIGINT
//
// ## Configuration
//
// ### Record (required, not validated)
// - `GANDI_API_KEY`: LiveDNS bearer token
// - `DOMAIN`: Zone managed at Gandi (e.g. example.com)
// - `SUBDOMAIN`: Record name inside the zone (e.g. home)
//
// ### Tuning (optional)
// - `DDNS_IP_SOURCE_URL`: Address-echo service (default https://api.ipify.org)
// - `GANDI_API_URL`: API base URL (default https://api.gandi.net)
// - `DDNS_POLL_INTERVAL_SECS`: Pause between iterations (default 60)
// - `DDNS_RECORD_TTL`: TTL sent with every update (default 300)
// - `DDNS_HTTP_TIMEOUT_SECS`: Per-request timeout (default 30)
// - `DDNS_TLS_VERIFY`: Verify the API certificate (default true)
// - `DDNS_MODE`: live | dry-run (default live)
// - `DDNS_LOG_LEVEL`: trace | debug | info | warn | error (default info)
//
// ## Example
//
// ```bash
// export GANDI_API_KEY=your_key
// export DOMAIN=example.com
// export SUBDOMAIN=home
//
// ddnsd
// ```

use anyhow::{Context, Result};
use ddns_core::{DdnsConfig, DdnsEngine, FixedDelay};
use ddns_ip_http::HttpIpSource;
use ddns_provider_gandi::LiveDnsProvider;
use ddns_resolver_system::SystemResolver;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let config = match DdnsConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let log_level = match config.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // "<timestamp> <LEVEL> <message>"
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddnsd daemon");

    // One sequential loop; no worker threads needed
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {:#}", e);
            DdnsExitCode::RuntimeError
        } else {
            DdnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Build the components and run the engine until a shutdown signal
async fn run_daemon(config: DdnsConfig) -> Result<()> {
    let ip_source = HttpIpSource::new(config.ip_source_url.clone(), config.http_timeout())
        .context("Failed to create IP source")?;
    let provider =
        LiveDnsProvider::from_config(&config).context("Failed to create LiveDNS provider")?;

    info!("IP source: {}", ip_source.url());
    info!("Provider: {:?}", provider);

    let engine = DdnsEngine::new(
        Box::new(ip_source),
        Box::new(SystemResolver::new()),
        Box::new(provider),
        config.record.clone(),
    );

    let record = engine.record();
    info!("Managing record: {} (ttl {})", record, record.ttl);

    // Handlers are installed before the first iteration so an early
    // signal is not lost
    let shutdown = ShutdownSignal::install()?;
    let mut ticker = FixedDelay::new(config.poll_interval());

    engine.run(&mut ticker, shutdown.wait()).await;

    info!("Shutting down daemon");
    Ok(())
}

/// Shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
struct ShutdownSignal {
    sigterm: Signal,
    sigint: Signal,
}

#[cfg(unix)]
impl ShutdownSignal {
    fn install() -> Result<Self> {
        let sigterm = signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
        let sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;
        Ok(Self { sigterm, sigint })
    }

    /// Resolves on the first signal received
    async fn wait(mut self) {
        let name = tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
        };
        info!("Received shutdown signal: {}", name);
    }
}

/// Shutdown signal (CTRL-C only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
struct ShutdownSignal;

#[cfg(not(unix))]
impl ShutdownSignal {
    fn install() -> Result<Self> {
        Ok(Self)
    }

    async fn wait(self) {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal: SIGINT"),
            Err(e) => {
                // Without a handler the daemon can only be killed
                error!("Failed to wait for CTRL-C: {}", e);
                std::future::pending::<()>().await
            }
        }
    }
}
