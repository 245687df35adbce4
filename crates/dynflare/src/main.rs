// # dynflare
//
// Thin command-line layer over dynflare-core. All reconciliation logic
// lives in the core crate; this binary only:
// 1. Parses arguments and loads the configuration file
// 2. Initializes logging and a single-threaded runtime
// 3. Wires the HTTP IP resolver, the Cloudflare client and the file
//    baseline store into a `Reconciler`
// 4. Maps the pass outcome to an exit code
//
// ## Configuration
//
// ```toml
// cache_file = "/var/lib/dynflare/cache.json"
//
// [cloudflare]
// email = "ops@example.com"
// key = "..."
//
// [[records]]
// id = "372e67954025e0ba6aaa6d586b9e0b59"
// type = "A"
// name = "home.example.com"
// zone_id = "023e105f4ecef8ad9ca31a8372d0c353"
// ```
//
// `DYNFLARE_AUTH_KEY` and `DYNFLARE_AUTH_EMAIL` override the credentials.
// `DYNFLARE_LOG_LEVEL` sets the log level (trace, debug, info, warn, error).
//
// ## Example
//
// ```bash
// dynflare --config /etc/dynflare.toml update --dry-run
// dynflare --config /etc/dynflare.toml records
// ```

mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use dynflare_core::report::{self, ZoneRecords};
use dynflare_core::{DynflareConfig, FileBaselineStore, Outcome, Reconciler};
use dynflare_ip_http::HttpIpResolver;
use dynflare_provider_cloudflare::CloudflareClient;
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Command, UpdateArgs};

/// Exit codes for different termination scenarios
///
/// - 0: Success (with `--detailed-exitcode`: IP unchanged)
/// - 1: Configuration or startup error
/// - 2: Runtime failure
/// - 3: Records updated (`--detailed-exitcode` only)
/// - 4: Update skipped by dry run (`--detailed-exitcode` only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DynflareExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
    Updated = 3,
    SkippedDryRun = 4,
}

impl DynflareExitCode {
    fn for_outcome(outcome: &Outcome, detailed: bool) -> Self {
        match outcome {
            Outcome::Failed(_) => Self::RuntimeError,
            Outcome::Updated { .. } if detailed => Self::Updated,
            Outcome::SkippedDryRun { .. } if detailed => Self::SkippedDryRun,
            _ => Self::Success,
        }
    }
}

impl From<DynflareExitCode> for ExitCode {
    fn from(code: DynflareExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Pick the log level
///
/// `--verbose` and `--dry-run` raise the level to at least debug; otherwise
/// `DYNFLARE_LOG_LEVEL` decides, defaulting to info.
fn log_level(verbose: bool, dry_run: bool, env_level: Option<&str>) -> Result<Level> {
    let base = match env_level.map(|l| l.trim().to_lowercase()) {
        None => Level::INFO,
        Some(level) => match level.as_str() {
            "" | "info" => Level::INFO,
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => anyhow::bail!(
                "{} '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                config::LOG_LEVEL_VAR,
                level
            ),
        },
    };

    if verbose || dry_run {
        Ok(base.max(Level::DEBUG))
    } else {
        Ok(base)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_level = std::env::var(config::LOG_LEVEL_VAR).ok();
    let level = match log_level(cli.verbose, cli.is_dry_run(), env_level.as_deref()) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DynflareExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DynflareExitCode::ConfigError.into();
    }

    let config = match config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return DynflareExitCode::ConfigError.into();
        }
    };
    debug!(?config, "Loaded configuration file");

    // One pass, strictly sequential: no worker threads needed
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DynflareExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        match &cli.command {
            Command::Update(args) => update(&config, args).await,
            Command::Domains => domains(&config).await,
            Command::Records => records(&config).await,
        }
    });

    code.into()
}

/// Assemble the production reconciler from configuration
fn build_reconciler(config: &DynflareConfig) -> Result<Reconciler> {
    let resolver = HttpIpResolver::from_config(&config.ip_lookup)
        .context("Failed to set up the IP lookup client")?;
    let provider = CloudflareClient::new(&config.cloudflare)
        .context("Failed to set up the Cloudflare client")?;
    let store = FileBaselineStore::new(&config.cache_file);

    Ok(Reconciler::new(
        Box::new(resolver),
        Box::new(provider),
        Box::new(store),
    ))
}

async fn update(config: &DynflareConfig, args: &UpdateArgs) -> DynflareExitCode {
    let reconciler = match build_reconciler(config) {
        Ok(reconciler) => reconciler,
        Err(e) => {
            error!("Startup error: {:#}", e);
            return DynflareExitCode::ConfigError;
        }
    };

    info!(
        records = config.records.len(),
        dry_run = args.dry_run,
        cache_file = %config.cache_file.display(),
        "Starting update"
    );

    let outcome = reconciler.reconcile(&config.records, args.dry_run).await;

    match &outcome {
        Outcome::Failed(e) => error!(outcome = outcome.label(), "Update failed: {}", e),
        _ => info!(outcome = outcome.label(), "Update finished"),
    }

    DynflareExitCode::for_outcome(&outcome, args.detailed_exitcode)
}

async fn domains(config: &DynflareConfig) -> DynflareExitCode {
    let provider = match CloudflareClient::new(&config.cloudflare) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Startup error: {}", e);
            return DynflareExitCode::ConfigError;
        }
    };

    match report::list_domains(&provider).await {
        Ok(zones) => {
            info!("Results");
            for (i, zone) in zones.iter().enumerate() {
                info!(id = %zone.id, name = %zone.name, status = %zone.status, "{}", i);
            }
            DynflareExitCode::Success
        }
        Err(e) => {
            error!("Failed to list domains: {}", e);
            DynflareExitCode::RuntimeError
        }
    }
}

async fn records(config: &DynflareConfig) -> DynflareExitCode {
    let provider = match CloudflareClient::new(&config.cloudflare) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Startup error: {}", e);
            return DynflareExitCode::ConfigError;
        }
    };

    match report::list_domain_records(&provider).await {
        Ok(report) => {
            for ZoneRecords { zone, records } in &report {
                info!(domain = %zone.name, "Records for domain");
                for (i, record) in records.iter().enumerate() {
                    info!(
                        id = %record.id,
                        name = %record.name,
                        content = %record.content,
                        record_type = %record.record_type,
                        "{}",
                        i
                    );
                }
            }
            DynflareExitCode::Success
        }
        Err(e) => {
            error!("Failed to list records: {}", e);
            DynflareExitCode::RuntimeError
        }
    }
}
