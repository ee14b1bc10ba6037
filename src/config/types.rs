// Configuration types module
// Defines the startup configuration tree; nothing here changes after launch

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub tls: TlsConfig,
    pub files: FilesConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads (runtime default when unset)
    #[serde(default)]
    pub workers: Option<usize>,
    /// Listen backlog passed to `listen(2)`
    pub backlog: i32,
}

/// Certificate and private key locations (PEM)
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TlsConfig {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
}

/// Document root and generic file serving behavior
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FilesConfig {
    pub root: PathBuf,
    pub index_files: Vec<String>,
    pub directory_listing: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub access_log: bool,
    pub access_log_format: AccessLogFormat,
    /// Access log file path (stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<PathBuf>,
    /// Error log file path (stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<PathBuf>,
}

/// Severity threshold, ordered from quietest to chattiest
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

/// Access log line layout
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccessLogFormat {
    /// Common Log Format
    Common,
    /// CLF plus referer and user agent
    Combined,
    /// One JSON object per line
    Json,
}

/// Connection handling limits
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds allowed for the TLS handshake
    pub handshake_timeout: u64,
    /// Seconds a single connection may stay open
    pub connection_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}
