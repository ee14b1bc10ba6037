// Connection handling module
// Runs the TLS handshake and HTTP/1.1 service for one accepted TCP connection

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::TlsAcceptor;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Everything a connection task needs, shared across all connections
pub struct ConnectionContext {
    pub state: Arc<AppState>,
    pub acceptor: TlsAcceptor,
    pub active_connections: AtomicUsize,
}

impl ConnectionContext {
    pub const fn new(state: Arc<AppState>, acceptor: TlsAcceptor) -> Self {
        Self {
            state,
            acceptor,
            active_connections: AtomicUsize::new(0),
        }
    }
}

/// Accept a connection unless the connection limit is reached, then serve
/// it on its own task.
pub fn accept_connection(stream: TcpStream, peer_addr: SocketAddr, ctx: &Arc<ConnectionContext>) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = ctx.active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = ctx.state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            ctx.active_connections.fetch_sub(1, Ordering::SeqCst);
            logger::log_connection_rejected(&peer_addr, prev_count, max_conn);
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    if let Err(e) = stream.set_nodelay(true) {
        logger::log_debug(&format!("Failed to set TCP_NODELAY for {peer_addr}: {e}"));
    }

    let ctx = Arc::clone(ctx);
    tokio::spawn(async move {
        serve_connection(stream, peer_addr, &ctx).await;
        ctx.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Handshake, then serve HTTP/1.1 until the client closes or the
/// connection timeout fires. Failures stay local to this connection.
async fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, ctx: &ConnectionContext) {
    let perf = &ctx.state.config.performance;

    let handshake_timeout = Duration::from_secs(perf.handshake_timeout);
    let tls_stream =
        match tokio::time::timeout(handshake_timeout, ctx.acceptor.accept(stream)).await {
            Ok(Ok(s)) => s,
            Ok(Err(e)) => {
                logger::log_tls_handshake_failed(&peer_addr, &e);
                return;
            }
            Err(_) => {
                logger::log_connection_timeout(&peer_addr, "TLS handshake", handshake_timeout);
                return;
            }
        };

    let io = TokioIo::new(tls_stream);
    let mut builder = http1::Builder::new();
    builder.keep_alive(perf.keep_alive);

    let state = Arc::clone(&ctx.state);
    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
    );

    let connection_timeout = Duration::from_secs(perf.connection_timeout);
    match tokio::time::timeout(connection_timeout, conn).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => logger::log_connection_error(&peer_addr, &err),
        Err(_) => {
            logger::log_connection_timeout(&peer_addr, "request handling", connection_timeout);
        }
    }
}
