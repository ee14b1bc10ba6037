//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: picks the handler operation for
//! the method and writes the access log line.

use crate::config::AppState;
use crate::handler::{FileHandler, RequestContext};
use crate::http::FileResponse;
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body;
use hyper::header::{CONTENT_ENCODING, REFERER, USER_AGENT};
use hyper::{Method, Request, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<FileResponse, Infallible> {
    let started = Instant::now();
    let uri = req.uri();
    let ctx = RequestContext {
        path: uri.path(),
        query: uri.query(),
    };

    logger::log_debug(&format!(
        "[Request] {} {} {:?} from {peer_addr}",
        req.method(),
        uri,
        req.version()
    ));

    let response = dispatch(state.handler.as_ref(), req.method(), &ctx).await;

    if state.access_log() {
        let mut entry = AccessLogEntry::new(peer_addr.ip(), req.method().as_str(), ctx.path);
        entry.query = ctx.query.map(ToString::to_string);
        entry.http_version = version_label(req.version());
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.content_encoding = header_string(response.headers().get(CONTENT_ENCODING));
        entry.referer = header_string(req.headers().get(REFERER));
        entry.user_agent = header_string(req.headers().get(USER_AGENT));
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route a request to the handler operation for its method
pub async fn dispatch(
    handler: &dyn FileHandler,
    method: &Method,
    ctx: &RequestContext<'_>,
) -> FileResponse {
    match method {
        &Method::GET => handler.handle_get(ctx).await,
        &Method::HEAD => handler.handle_head(ctx).await,
        _ => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            handler.handle_unsupported(method)
        }
    }
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

fn header_string(value: Option<&hyper::header::HeaderValue>) -> Option<String> {
    value
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
