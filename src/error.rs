//! Startup error types
//!
//! Request-scoped failures never surface here: they become 4xx/5xx
//! responses inside the handler.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for server setup and lifecycle operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Fatal errors that prevent the server from starting or keep running
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be loaded or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Effective configuration could not be rendered as TOML
    #[error("Cannot render configuration: {0}")]
    Render(#[from] toml::ser::Error),

    /// Host/port pair does not form a socket address
    #[error("Invalid listen address '{0}'")]
    InvalidAddress(String),

    /// Document root is missing or not a directory
    #[error("Invalid document root '{}': {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    /// Certificate or key could not be loaded, or rustls rejected them
    #[error("TLS error: {0}")]
    Tls(String),

    /// Listener could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Other I/O failure (runtime creation, log files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
