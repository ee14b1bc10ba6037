//! Request handler module
//!
//! [`FileHandler`] is the set of operations a file server answers. Its
//! default methods delegate to generic [`StaticFiles`] serving; a handler
//! customizes a method by overriding it, as [`PrecompressedFiles`] does for
//! GET.

pub mod precompressed;
pub mod router;
pub mod static_files;

use async_trait::async_trait;
use hyper::Method;

use crate::http::{self, FileResponse};

pub use precompressed::PrecompressedFiles;
pub use router::{dispatch, handle_request};
pub use static_files::StaticFiles;

/// Per-request data a handler needs
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// URL path as received (still percent-encoded)
    pub path: &'a str,
    pub query: Option<&'a str>,
}

#[async_trait]
pub trait FileHandler: Send + Sync {
    /// Generic file serving the default methods delegate to
    fn files(&self) -> &StaticFiles;

    async fn handle_get(&self, ctx: &RequestContext<'_>) -> FileResponse {
        self.files().serve(ctx, false).await
    }

    async fn handle_head(&self, ctx: &RequestContext<'_>) -> FileResponse {
        self.files().serve(ctx, true).await
    }

    fn handle_unsupported(&self, method: &Method) -> FileResponse {
        http::build_501_response(method)
    }
}

#[async_trait]
impl FileHandler for StaticFiles {
    fn files(&self) -> &StaticFiles {
        self
    }
}
