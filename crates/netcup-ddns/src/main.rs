// # netcup-ddns
//
// Single-run dynamic DNS updater. Meant to be invoked periodically by an
// external scheduler (cron, systemd timer). Each invocation:
// 1. Reads configuration from environment variables
// 2. Logs in to the netcup API
// 3. Discovers the public IPv4 (and IPv6) address
// 4. Updates the hostname's A/AAAA records if they differ
//
// This binary is a thin integration layer. All decisions live in ddns-core.
//
// ## Configuration
//
// ### Required
// - `NETCUP_CUSTOMER_NUMBER`: netcup customer number
// - `NETCUP_API_KEY`: API key
// - `NETCUP_API_PASSWORD`: API password
// - `NETCUP_DOMAIN`: Zone to update (e.g. example.com)
// - `NETCUP_HOSTNAME`: Record name within the zone (e.g. home, @)
//
// ### Optional
// - `NETCUP_DISABLE_IPV6`: y/yes/true/1 to skip IPv6 entirely
// - `NETCUP_DRY_RUN`: y/yes/true/1 to log the write instead of sending it
// - `NETCUP_IP_DISCOVERY_URL`: Address echo endpoint (default: api64.ipify.org)
// - `NETCUP_API_ENDPOINT`: netcup JSON API endpoint
// - `NETCUP_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export NETCUP_CUSTOMER_NUMBER=12345
// export NETCUP_API_KEY=your_key
// export NETCUP_API_PASSWORD=your_password
// export NETCUP_DOMAIN=example.com
// export NETCUP_HOSTNAME=home
//
// netcup-ddns
// ```

use anyhow::Result;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use ddns_core::{DdnsConfig, ReconcileOutcome, ReconcileSettings, Reconciler};
use ddns_ip_http::HttpAddressSource;
use ddns_provider_netcup::NetcupClient;

/// Exit codes
///
/// Any failure, whatever its kind, exits with 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Run completed, with or without a record update
    Success = 0,
    /// Configuration, discovery, transport or provider error
    Failure = 1,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Map a validated log level name to a tracing level
fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> ExitCode {
    // Load and validate configuration before touching the network
    let config = match DdnsConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {}", e);
            return DdnsExitCode::Failure.into();
        }
    };

    // Diagnostics go to stderr; stdout stays empty
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_log_level(&config.log_level))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::Failure.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::Failure.into();
        }
    };

    let result = rt.block_on(async {
        match run(config).await {
            Ok(_) => DdnsExitCode::Success,
            Err(e) => {
                error!("error: {:#}", e);
                DdnsExitCode::Failure
            }
        }
    });

    result.into()
}

/// Run one reconciliation
async fn run(config: DdnsConfig) -> Result<ReconcileOutcome> {
    if config.dry_run {
        warn!("Running in DRY-RUN mode - no changes will be made");
    }

    let settings = ReconcileSettings::from(&config);
    let source = HttpAddressSource::new(config.discovery_url);
    let client = NetcupClient::new(config.credentials, config.api_endpoint)
        .with_dry_run(config.dry_run);

    let outcome = Reconciler::new(settings).run(client, &source).await?;
    info!("Run complete: {:?}", outcome);

    Ok(outcome)
}
