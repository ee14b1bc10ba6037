// Server loop module
// Accepts connections until shutdown is signalled

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::{accept_connection, ConnectionContext};
use crate::logger;

/// Pause after a failed accept (e.g. EMFILE) so the loop does not spin
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(50);

/// Accept loop. Returns when `shutdown` is notified; the listener is dropped
/// (closed) on return while in-flight connection tasks keep running.
pub async fn start_server_loop(
    listener: TcpListener,
    ctx: Arc<ConnectionContext>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &ctx),
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                }
            }

            () = shutdown.notified() => {
                logger::log_shutdown("Shutdown requested");
                return;
            }
        }
    }
}
