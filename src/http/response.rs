//! HTTP response building module
//!
//! Builders for every response the file server sends. Builder failures
//! (only possible with invalid header values) fall back to a bare 500.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use hyper::http::response::Builder;
use hyper::{Method, Response, StatusCode};

pub type FileResponse = Response<Full<Bytes>>;

/// Build 200 response for a file on disk
pub fn build_file_response(data: Bytes, content_type: &str) -> FileResponse {
    finish(
        Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, data.len()),
        data,
        "200",
    )
}

/// Build the header-only answer to HEAD for a file of `content_length` bytes
pub fn build_head_response(content_type: &str, content_length: u64) -> FileResponse {
    finish(
        Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, content_length),
        Bytes::new(),
        "HEAD",
    )
}

/// Build 200 response carrying an already-encoded body.
///
/// `content_type` describes the decoded representation; `encoding` is what
/// the client must undo first.
pub fn build_encoded_response(data: Bytes, content_type: &str, encoding: &str) -> FileResponse {
    finish(
        Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_ENCODING, encoding)
            .header(CONTENT_LENGTH, data.len()),
        data,
        "200 encoded",
    )
}

/// Build 200 HTML response (directory listings)
pub fn build_html_response(html: String, is_head: bool) -> FileResponse {
    const HTML: &str = "text/html; charset=utf-8";
    if is_head {
        build_head_response(HTML, html.len() as u64)
    } else {
        build_file_response(Bytes::from(html), HTML)
    }
}

/// Build 301 redirect, used to add the trailing slash to directory URLs
pub fn build_redirect_response(location: &str) -> FileResponse {
    finish(
        Response::builder()
            .status(StatusCode::MOVED_PERMANENTLY)
            .header(LOCATION, location)
            .header(CONTENT_LENGTH, 0),
        Bytes::new(),
        "301",
    )
}

pub fn build_403_response() -> FileResponse {
    build_error_response(StatusCode::FORBIDDEN, "403 Forbidden")
}

pub fn build_404_response() -> FileResponse {
    build_error_response(StatusCode::NOT_FOUND, "404 Not Found")
}

pub fn build_500_response() -> FileResponse {
    build_error_response(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
}

/// Build 501 response for methods the file server does not implement
pub fn build_501_response(method: &Method) -> FileResponse {
    build_error_response(
        StatusCode::NOT_IMPLEMENTED,
        &format!("501 Unsupported method ({method})"),
    )
}

fn build_error_response(status: StatusCode, message: &str) -> FileResponse {
    let body = Bytes::from(message.to_owned());
    finish(
        Response::builder()
            .status(status)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .header(CONTENT_LENGTH, body.len()),
        body,
        status.as_str(),
    )
}

fn finish(builder: Builder, body: Bytes, what: &str) -> FileResponse {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to build {what} response: {e}"));
        let mut fallback = Response::new(Full::new(Bytes::new()));
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}
