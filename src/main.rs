//! cluster-probe - Cluster connectivity diagnostics
//!
//! This is the main entry point for the cluster-probe binary. The tool
//! probes the cluster's coref resolver endpoint over HTTP, scans the
//! candidate hosts for a reachable AMQP broker, and can monitor the "ufo"
//! fanout exchange continuously.

mod cli;
mod config;
mod error;
mod hosts;
mod logging;
mod monitor;
mod probe;
mod scanner;
mod version;

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::{Cli, Commands, ConfigSubcommand};
use crate::config::ProbeConfig;
use crate::error::{Error, Result};
use crate::probe::{BrokerProber, ResolverProber};

fn main() {
    let cli = Cli::parse();

    // Exit-code contract: 0 = clean shutdown or at least one host found,
    // 1 = no hosts found or fatal error.
    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprint!("{}", e.format_for_terminal());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    // Commands that don't need full logging or a runtime
    match &cli.command {
        Commands::Version => {
            version::print_version();
            return Ok(true);
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            handle_config_command(subcommand.clone())?;
            return Ok(true);
        }
        _ => {}
    }

    // Load configuration for probe commands
    let config_path = match &cli.command {
        Commands::Resolve { config } => config.clone(),
        Commands::Scan { config, .. } => config.clone(),
        Commands::Monitor { config, .. } => config.clone(),
        _ => None,
    };

    let mut config = ProbeConfig::load(config_path.as_deref())?;

    // CLI overrides
    if let Commands::Scan { width: Some(w), .. } = &cli.command {
        config.scanner.width = *w;
    }

    // The guards must be kept alive for the lifetime of the program
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::build_info();
    info!(
        version = %build.full_version(),
        target = %build.target,
        "Starting cluster-probe"
    );

    // Build and run the tokio runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(num_cpus::get().min(8))
        .thread_name("cluster-probe")
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create async runtime: {}", e)))?;

    runtime.block_on(async {
        match cli.command {
            Commands::Resolve { .. } => run_resolve(&config).await,
            Commands::Scan { monitor, .. } => run_scan(&config, monitor).await,
            Commands::Monitor { host, .. } => run_monitor(&config, &host).await,
            Commands::Version | Commands::Config { .. } => unreachable!(),
        }
    })
}

/// Sequentially probe the host list for a live resolver endpoint
async fn run_resolve(config: &ProbeConfig) -> Result<bool> {
    let hosts = config.host_list();
    info!(hosts = hosts.len(), port = config.resolver.port, "Probing resolver endpoints");

    let prober = ResolverProber::new(&config.resolver)?;
    match prober.scan(&hosts).await {
        Some(hit) => {
            println!("Live resolver endpoint: {}:{}", hit.host, config.resolver.port);
            println!(
                "{}",
                serde_json::to_string_pretty(&hit.body).unwrap_or_else(|_| hit.body.to_string())
            );
            Ok(true)
        }
        None => {
            println!("No live resolver endpoint among {} hosts", hosts.len());
            Ok(false)
        }
    }
}

/// Scan all candidate hosts for reachable brokers, optionally monitoring
/// the first active one afterwards
async fn run_scan(config: &ProbeConfig, monitor_after: bool) -> Result<bool> {
    let hosts = config.host_list();
    let prober = Arc::new(BrokerProber::new(&config.broker));

    let hits = scanner::scan_hosts(&hosts, config.scanner.width, move |host| {
        let prober = prober.clone();
        async move { prober.probe(&host).await }
    })
    .await;

    if hits.is_empty() {
        println!("No active brokers among {} hosts", hosts.len());
        return Ok(false);
    }

    println!("Active brokers ({} of {} hosts):", hits.len(), hosts.len());
    for hit in &hits {
        println!("  {}", hit.host);
        if let Some(message) = &hit.message {
            println!("    captured: {}", message);
        }
    }

    if monitor_after {
        let first = hits[0].host.clone();
        return run_monitor(config, &first).await;
    }

    Ok(true)
}

/// Monitor one host's exchange until Ctrl-C
async fn run_monitor(config: &ProbeConfig, host: &str) -> Result<bool> {
    let cancel = CancellationToken::new();

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
            signal_cancel.cancel();
        }
    });

    monitor::monitor_host(&config.broker, host, cancel).await?;
    println!("Monitor stopped");
    Ok(true)
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = ProbeConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            config::init_config(path.as_deref(), force)?;
        }
        ConfigSubcommand::Validate { config } => {
            let path = config.as_deref();
            match ProbeConfig::load(path) {
                Ok(_) => {
                    println!("Configuration is valid.");
                }
                Err(e) => {
                    eprint!("{}", e.format_for_terminal());
                    std::process::exit(e.exit_code());
                }
            }
        }
    }

    Ok(())
}
