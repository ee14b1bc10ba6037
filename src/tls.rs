//! TLS support using rustls
//!
//! Loads the PEM certificate chain and private key named in the config and
//! builds the acceptor that wraps every accepted TCP stream. TLS 1.2/1.3
//! only, ALPN advertises `http/1.1`.

use crate::config::TlsConfig;
use crate::error::{Result, ServerError};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;

/// Build a TLS acceptor from the configured certificate and key
pub fn build_acceptor(config: &TlsConfig) -> Result<TlsAcceptor> {
    Ok(TlsAcceptor::from(build_server_config(config)?))
}

/// Build the rustls server config
pub fn build_server_config(config: &TlsConfig) -> Result<Arc<rustls::ServerConfig>> {
    let certs = load_certs(&config.cert_file)?;
    let key = load_private_key(&config.key_file)?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut server_config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ServerError::Tls(e.to_string()))?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| ServerError::Tls(format!("Certificate/key rejected: {e}")))?;
    server_config.alpn_protocols = vec![b"http/1.1".to_vec()];

    Ok(Arc::new(server_config))
}

/// Load certificates from PEM file
pub fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = open_pem(path, "certificate")?;

    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| {
            ServerError::Tls(format!("Failed to parse certs in '{}': {e}", path.display()))
        })?;

    if certs.is_empty() {
        return Err(ServerError::Tls(format!(
            "No certificates found in '{}'",
            path.display()
        )));
    }

    Ok(certs)
}

/// Load the first private key (PKCS#1, PKCS#8 or SEC1) from PEM file
pub fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let mut reader = open_pem(path, "key")?;

    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| {
            ServerError::Tls(format!("Failed to parse key in '{}': {e}", path.display()))
        })?
        .ok_or_else(|| {
            ServerError::Tls(format!("No private key found in '{}'", path.display()))
        })
}

fn open_pem(path: &Path, what: &str) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| {
        ServerError::Tls(format!(
            "Failed to open {what} file '{}': {e}",
            path.display()
        ))
    })?;
    Ok(BufReader::new(file))
}
