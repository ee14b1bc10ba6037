// Server module entry point
// Binds the TLS listener and runs the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::config::AppState;
use crate::error::{Result, ServerError};
use crate::{logger, tls};

pub use connection::ConnectionContext;
pub use listener::create_listener;
pub use server_loop::start_server_loop;

/// A bound HTTPS server, ready to accept
pub struct Server {
    listener: TcpListener,
    ctx: Arc<ConnectionContext>,
}

impl Server {
    /// Load TLS material and bind the configured address.
    ///
    /// TLS is loaded first so a bad certificate never leaves a bound port
    /// behind.
    pub fn bind(state: Arc<AppState>) -> Result<Self> {
        let addr = state.config.get_socket_addr()?;
        let acceptor = tls::build_acceptor(&state.config.tls)?;
        let listener = create_listener(addr, state.config.server.backlog)
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            ctx: Arc::new(ConnectionContext::new(state, acceptor)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` is notified
    pub async fn serve(self, shutdown: Arc<Notify>) -> Result<()> {
        let addr = self.local_addr()?;
        logger::log_server_start(&addr, &self.ctx.state);
        start_server_loop(self.listener, self.ctx, shutdown).await;
        Ok(())
    }
}

/// Bind, install signal handlers and serve until SIGINT/SIGTERM
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let server = Server::bind(state)?;
    let shutdown = Arc::new(Notify::new());
    signal::start_signal_handler(Arc::clone(&shutdown));
    server.serve(shutdown).await
}
