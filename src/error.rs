//! Error types for cluster-probe
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Error context and chaining
//!
//! Probe failures against individual hosts are not errors; they are
//! [`crate::probe::ProbeOutcome::Failed`] values the scanners consume and
//! move past. The variants here cover failures that stop a command.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for probe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoNotFound = 203,

    // Connection errors (3xx)
    ConnectionFailed = 300,
    ConnectionTimeout = 301,

    // Protocol errors (4xx)
    ProtocolError = 400,

    // Decode errors (5xx)
    DecodeError = 500,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for cluster-probe
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Connection Errors
    // ─────────────────────────────────────────────────────────────

    /// Connection failed (refused, DNS failure, unreachable)
    #[error("Failed to connect to {host}: {message}")]
    ConnectionFailed { host: String, message: String },

    /// Connection or request timeout
    #[error("Connection to {host} timed out after {timeout_secs}s")]
    ConnectionTimeout { host: String, timeout_secs: u64 },

    // ─────────────────────────────────────────────────────────────
    // Protocol Errors
    // ─────────────────────────────────────────────────────────────

    /// Broker protocol error after the TCP connection was established
    #[error("Broker protocol error on {host}: {message}")]
    Protocol { host: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Decode Errors
    // ─────────────────────────────────────────────────────────────

    /// Response or message body was not valid JSON
    #[error("Failed to decode payload: {message}")]
    Decode { message: String },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::Config(_) => ErrorCode::ConfigValidation,

            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoWrite,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,

            Error::ConnectionFailed { .. } => ErrorCode::ConnectionFailed,
            Error::ConnectionTimeout { .. } => ErrorCode::ConnectionTimeout,

            Error::Protocol { .. } => ErrorCode::ProtocolError,
            Error::Decode { .. } => ErrorCode::DecodeError,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Check if the error should stop a command immediately.
    ///
    /// Connection, protocol, and decode errors against a single host are
    /// skip-and-continue by design; configuration and internal errors are not.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConfigNotFound { .. } | Error::Config(_) | Error::Internal(_)
        )
    }

    /// Exit code for the CLI.
    ///
    /// The contract is deliberately small: 0 means a clean shutdown or at
    /// least one host found, 1 means no hosts found or a fatal error.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'cluster-probe config init' to create a default configuration file."
            ),
            Error::Config(_) => Some(
                "Review the configuration file and fix the invalid values. Run 'cluster-probe config validate' to see details."
            ),
            Error::ConnectionFailed { .. } => Some(
                "Check that the host is up and reachable from this node. 'cluster-probe scan' tries every configured host."
            ),
            Error::ConnectionTimeout { .. } => Some(
                "The host may be down or firewalled. Try raising the timeout in the configuration."
            ),
            Error::Protocol { .. } => Some(
                "The broker answered but the handshake failed. Verify the port is really an AMQP listener."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            code.as_str(),
            self
        );

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        let code = self.code();
        format!("[{}] {}", code.as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors (for ergonomic error creation)
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound { path: path.into() }
    }

    /// Create a connection failed error
    pub fn connection_failed(host: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConnectionFailed {
            host: host.into(),
            message: message.into(),
        }
    }

    /// Create a connection timeout error
    pub fn connection_timeout(host: impl Into<String>, timeout_secs: u64) -> Self {
        Error::ConnectionTimeout {
            host: host.into(),
            timeout_secs,
        }
    }

    /// Create a broker protocol error
    pub fn protocol(host: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Protocol {
            host: host.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
