//! valkey-merge - consolidates the keyspaces of one or more Redis/Valkey
//! instances into a single destination store.
//!
//! This is the binary entry point:
//! - Initializes structured logging
//! - Loads and validates the run configuration
//! - Connects the destination and each source in configured order
//! - Runs one merge pass per source and reports final counters

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use valkey_merge::client::{StoreClient, StoreConfig};
use valkey_merge::config::{Endpoint, MergeConfig};
use valkey_merge::merge::{Counters, MergeOrchestrator, Result};

/// Merge the keyspaces of one or more Redis/Valkey instances into a single
/// destination store, deduplicating keys that collide across sources.
#[derive(Parser, Debug)]
#[command(name = "valkey-merge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the run configuration file (TOML)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        env = "VALKEY_MERGE_CONFIG"
    )]
    config: PathBuf,

    /// SCAN count hint per batch (overrides config file)
    #[arg(long = "scan-count", value_name = "N")]
    scan_count: Option<u32>,

    /// Processed entries between pipeline flushes (overrides config file)
    #[arg(long = "flush-threshold", value_name = "N")]
    flush_threshold: Option<usize>,

    /// Log level: trace, debug, info, warn, error
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        env = "VALKEY_MERGE_LOG_LEVEL",
        default_value = "info"
    )]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mut config = match MergeConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %cli.config.display(), error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Some(scan_count) = cli.scan_count {
        config.scan_count = scan_count;
    }
    if let Some(flush_threshold) = cli.flush_threshold {
        config.flush_threshold = flush_threshold;
    }

    if let Err(e) = config.validate() {
        error!(error = %e, "invalid configuration");
        return ExitCode::FAILURE;
    }

    info!(
        sources = config.sources.len(),
        destination = %config.destination.label(),
        scan_count = config.scan_count,
        flush_threshold = config.flush_threshold,
        "starting merge run"
    );

    match run(&config).await {
        Ok(counters) => {
            info!(
                scanned = counters.scanned,
                merged = counters.merged,
                expired_skipped = counters.expired_skipped,
                duplicate_skipped = counters.duplicate_skipped,
                "merge run complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "merge run failed");
            ExitCode::FAILURE
        }
    }
}

/// Connect the destination and drive one pass per source, in order.
async fn run(config: &MergeConfig) -> Result<Counters> {
    let dest = StoreClient::connect(store_config(&config.destination)).await?;
    let mut orchestrator =
        MergeOrchestrator::new(&dest, config.scan_count, config.flush_threshold);

    for endpoint in &config.sources {
        let label = endpoint.label();
        let source = StoreClient::connect(store_config(endpoint)).await?;
        orchestrator.merge_source(&label, &source).await?;
        source.close().await?;
    }

    let counters = orchestrator.into_counters();
    dest.close().await?;
    Ok(counters)
}

fn store_config(endpoint: &Endpoint) -> StoreConfig {
    let mut config = StoreConfig::new(endpoint.host.clone(), endpoint.port);
    if let Some(ref password) = endpoint.password {
        config = config.with_password(password.clone());
    }
    config
}

fn init_tracing(level: &str) {
    let default_directives = format!("valkey_merge={level},fred=warn");
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directives));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
