//! Logger module
//!
//! Server lifecycle, diagnostics and access logging. Messages below the
//! configured level are dropped. Before [`init`] runs everything goes to
//! stdout/stderr unfiltered, which keeps startup failures visible.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{AccessLogFormat, AppState, LogLevel, LoggingConfig};
use std::net::SocketAddr;
use std::time::Duration;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        config.level,
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

fn write_info(level: LogLevel, message: &str) {
    match writer::get() {
        Some(w) if w.enabled(level) => w.write_info(message),
        Some(_) => {}
        None => println!("{message}"),
    }
}

fn write_error(level: LogLevel, message: &str) {
    match writer::get() {
        Some(w) if w.enabled(level) => w.write_error(message),
        Some(_) => {}
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    let cfg = &state.config;
    log_info("======================================");
    log_info("HTTPS static server started");
    log_info(&format!("Listening on: https://{addr}"));
    log_info(&format!("Document root: {}", state.root.display()));
    log_info(&format!("Certificate: {}", cfg.tls.cert_file.display()));
    log_info(&format!("Log level: {:?}", cfg.logging.level));
    if let Some(workers) = cfg.server.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
    if let Some(max) = cfg.performance.max_connections {
        log_info(&format!("Max connections: {max}"));
    }
    if let Some(ref path) = cfg.logging.access_log_file {
        log_info(&format!("Access log: {}", path.display()));
    }
    if let Some(ref path) = cfg.logging.error_log_file {
        log_info(&format!("Error log: {}", path.display()));
    }
    log_info("Serving .gz siblings with Content-Encoding: gzip when present");
    log_info("======================================");
}

pub fn log_shutdown(reason: &str) {
    log_info(&format!("[Shutdown] {reason}, no longer accepting connections"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_rejected(peer_addr: &SocketAddr, active: usize, max: u64) {
    log_warning(&format!(
        "Max connections reached: {active}/{max}. Connection from {peer_addr} rejected."
    ));
}

pub fn log_tls_handshake_failed(peer_addr: &SocketAddr, err: &std::io::Error) {
    log_warning(&format!("[TLS] Handshake with {peer_addr} failed: {err}"));
}

pub fn log_connection_timeout(peer_addr: &SocketAddr, stage: &str, after: Duration) {
    log_warning(&format!(
        "[Connection] {peer_addr} timed out during {stage} after {}s",
        after.as_secs()
    ));
}

pub fn log_connection_error(peer_addr: &SocketAddr, err: &impl std::fmt::Display) {
    log_error(&format!("Failed to serve connection from {peer_addr}: {err}"));
}

pub fn log_error(message: &str) {
    write_error(LogLevel::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(LogLevel::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_info(LogLevel::Info, message);
}

pub fn log_debug(message: &str) {
    write_info(LogLevel::Debug, &format!("[DEBUG] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: AccessLogFormat) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}
