//! Configuration system for cluster-probe
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (CLUSTER_PROBE_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::hosts::HostRange;

/// Main probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Candidate host enumeration
    pub hosts: HostSettings,

    /// HTTP resolver endpoint settings
    pub resolver: ResolverSettings,

    /// AMQP broker settings
    pub broker: BrokerSettings,

    /// Parallel scanner settings
    pub scanner: ScannerSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Candidate host enumeration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// Numbered host ranges to expand (prefix + inclusive bounds)
    pub ranges: Vec<HostRange>,

    /// Domain suffix appended to every generated name
    pub domain: String,
}

/// HTTP resolver endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// TCP port the resolver listens on
    pub port: u16,

    /// Request path
    pub path: String,

    /// Sample sentence sent as the probe payload
    pub sample_text: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// AMQP broker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerSettings {
    /// AMQP port
    pub port: u16,

    /// Broker username
    pub username: String,

    /// Broker password
    pub password: String,

    /// Fanout exchange to bind against
    pub exchange: String,

    /// Heartbeat interval in seconds
    pub heartbeat_secs: u16,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

/// Parallel scanner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    /// Worker-pool width for concurrent probes
    pub width: usize,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

// Default implementations

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            hosts: HostSettings::default(),
            resolver: ResolverSettings::default(),
            broker: BrokerSettings::default(),
            scanner: ScannerSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            ranges: vec![HostRange::new("cpu", 1, 2), HostRange::new("gpu", 1, 22)],
            domain: ".cm.cluster".to_string(),
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            port: 65535,
            path: "/resolve_coref".to_string(),
            sample_text: "John said he would help Mary. She was grateful.".to_string(),
            timeout_secs: 3,
        }
    }
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            port: 5672,
            username: "guest".to_string(),
            password: "guest".to_string(),
            exchange: "ufo".to_string(),
            heartbeat_secs: 600,
            connect_timeout_secs: 5,
        }
    }
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self { width: 10 }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl ProbeConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        let config_file = Self::find_config_file(config_path)?;
        if let Some(path) = config_file {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
            config = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let expanded = shellexpand::tilde(path);
            let path = PathBuf::from(expanded.as_ref());
            if path.exists() {
                return Ok(Some(path));
            } else {
                return Err(Error::config_not_found(path));
            }
        }

        // Search in standard locations
        let search_paths = [
            // Current directory
            PathBuf::from("cluster-probe.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("cluster-probe").join("probe.toml"))
                .unwrap_or_default(),
            // Home directory
            dirs::home_dir()
                .map(|p| p.join(".cluster-probe").join("probe.toml"))
                .unwrap_or_default(),
            // System config (Linux)
            PathBuf::from("/etc/cluster-probe/probe.toml"),
        ];

        for path in &search_paths {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Host settings
        if let Ok(val) = std::env::var("CLUSTER_PROBE_DOMAIN") {
            self.hosts.domain = val;
        }

        // Resolver settings
        if let Ok(val) = std::env::var("CLUSTER_PROBE_RESOLVER_PORT") {
            if let Ok(n) = val.parse() {
                self.resolver.port = n;
            }
        }
        if let Ok(val) = std::env::var("CLUSTER_PROBE_RESOLVER_PATH") {
            self.resolver.path = val;
        }
        if let Ok(val) = std::env::var("CLUSTER_PROBE_RESOLVER_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.resolver.timeout_secs = n;
            }
        }

        // Broker settings
        if let Ok(val) = std::env::var("CLUSTER_PROBE_BROKER_PORT") {
            if let Ok(n) = val.parse() {
                self.broker.port = n;
            }
        }
        if let Ok(val) = std::env::var("CLUSTER_PROBE_BROKER_USERNAME") {
            self.broker.username = val;
        }
        if let Ok(val) = std::env::var("CLUSTER_PROBE_BROKER_PASSWORD") {
            self.broker.password = val;
        }
        if let Ok(val) = std::env::var("CLUSTER_PROBE_BROKER_EXCHANGE") {
            self.broker.exchange = val;
        }
        if let Ok(val) = std::env::var("CLUSTER_PROBE_BROKER_HEARTBEAT_SECS") {
            if let Ok(n) = val.parse() {
                self.broker.heartbeat_secs = n;
            }
        }

        // Scanner settings
        if let Ok(val) = std::env::var("CLUSTER_PROBE_SCAN_WIDTH") {
            if let Ok(n) = val.parse() {
                self.scanner.width = n;
            }
        }

        // Logging settings
        if let Ok(val) = std::env::var("CLUSTER_PROBE_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("CLUSTER_PROBE_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("CLUSTER_PROBE_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate host ranges
        if self.hosts.ranges.is_empty() {
            return Err(Error::Config("At least one host range is required".to_string()));
        }
        for range in &self.hosts.ranges {
            if range.prefix.is_empty() {
                return Err(Error::Config("Host range prefix cannot be empty".to_string()));
            }
            if range.start == 0 || range.is_empty() {
                return Err(Error::Config(format!(
                    "Invalid host range {}[{}-{}]: bounds must satisfy 1 <= start <= end",
                    range.prefix, range.start, range.end
                )));
            }
        }
        if !self.hosts.domain.starts_with('.') {
            return Err(Error::Config(format!(
                "Domain suffix '{}' must start with '.'",
                self.hosts.domain
            )));
        }

        // Validate resolver settings
        if self.resolver.timeout_secs == 0 {
            return Err(Error::Config(
                "resolver.timeout_secs must be at least 1".to_string(),
            ));
        }
        if !self.resolver.path.starts_with('/') {
            return Err(Error::Config(format!(
                "resolver.path '{}' must start with '/'",
                self.resolver.path
            )));
        }

        // Validate scanner settings
        if self.scanner.width == 0 {
            return Err(Error::Config("scanner.width must be at least 1".to_string()));
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Expand the configured ranges into the full candidate host list
    pub fn host_list(&self) -> Vec<String> {
        crate::hosts::generate_hosts(&self.hosts.ranges, &self.hosts.domain)
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<()> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".cluster-probe")
                .join("probe.toml")
        });

    // Check if file exists
    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
    }

    // Generate default config with comments
    let config_content = generate_default_config();

    // Write the file
    fs::write(&config_path, config_content)
        .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

    println!("Configuration file created: {}", config_path.display());
    Ok(())
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# cluster-probe Configuration
# https://github.com/cm-cluster/cluster-probe

[hosts]
# Numbered host ranges expanded to {prefix}{NNN}{domain}
ranges = [
    { prefix = "cpu", start = 1, end = 2 },
    { prefix = "gpu", start = 1, end = 22 },
]

# Domain suffix appended to every generated name
domain = ".cm.cluster"

[resolver]
# TCP port the coref resolver listens on
port = 65535

# Request path
path = "/resolve_coref"

# Sample sentence sent as the probe payload
sample_text = "John said he would help Mary. She was grateful."

# Per-request timeout in seconds
timeout_secs = 3

[broker]
# AMQP port
port = 5672

# Broker credentials (cluster brokers run with the defaults)
username = "guest"
password = "guest"

# Fanout exchange to bind against
exchange = "ufo"

# Heartbeat interval in seconds
heartbeat_secs = 600

# Connection timeout in seconds
connect_timeout_secs = 5

[scanner]
# Worker-pool width for concurrent probes
width = 10

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.cluster-probe/logs/probe.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#.to_string()
}
