//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for cluster-probe.

use clap::{Parser, Subcommand};

/// Default host monitored when none is given
pub const DEFAULT_MONITOR_HOST: &str = "cpu001.cm.cluster";

/// cluster-probe - Cluster connectivity diagnostics
///
/// Probes the cluster's coreference-resolution endpoint and the "ufo"
/// message-broker exchange across the candidate hosts, and can sit on the
/// exchange printing everything it publishes.
#[derive(Parser, Debug)]
#[command(name = "cluster-probe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find a live coref resolver endpoint (sequential HTTP probe)
    Resolve {
        /// Path to configuration file
        #[arg(short, long, env = "CLUSTER_PROBE_CONFIG")]
        config: Option<String>,
    },

    /// Scan all candidate hosts for a reachable broker (parallel probe)
    Scan {
        /// Path to configuration file
        #[arg(short, long, env = "CLUSTER_PROBE_CONFIG")]
        config: Option<String>,

        /// Worker-pool width (overrides configuration)
        #[arg(short, long)]
        width: Option<usize>,

        /// Keep monitoring the first active host after the scan
        #[arg(short, long)]
        monitor: bool,
    },

    /// Monitor the exchange on one host until interrupted
    Monitor {
        /// Host to monitor
        #[arg(default_value = DEFAULT_MONITOR_HOST)]
        host: String,

        /// Path to configuration file
        #[arg(short, long, env = "CLUSTER_PROBE_CONFIG")]
        config: Option<String>,
    },

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}
