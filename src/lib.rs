//! gzserve: HTTPS static file server that answers GET for `X` with the
//! bytes of a precompressed `X.gz` sibling (and `Content-Encoding: gzip`)
//! whenever one exists, and serves `X` itself otherwise.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod tls;

pub use error::{Result, ServerError};
