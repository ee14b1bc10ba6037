//! Precompressed asset serving
//!
//! GET for `X` answers with the bytes of `X.gz` and `Content-Encoding: gzip`
//! when that sibling is a regular file. Everything else is left to the
//! wrapped [`StaticFiles`].

use async_trait::async_trait;

use super::static_files::{is_missing, open_regular, read_all, server_error_response};
use super::{FileHandler, RequestContext, StaticFiles};
use crate::http::{self, mime, path, FileResponse};
use crate::logger;

const GZIP_ENCODING: &str = "gzip";

/// File handler preferring `.gz` siblings on GET
#[derive(Debug, Clone)]
pub struct PrecompressedFiles {
    files: StaticFiles,
}

impl PrecompressedFiles {
    pub const fn new(files: StaticFiles) -> Self {
        Self { files }
    }
}

#[async_trait]
impl FileHandler for PrecompressedFiles {
    fn files(&self) -> &StaticFiles {
        &self.files
    }

    async fn handle_get(&self, ctx: &RequestContext<'_>) -> FileResponse {
        // The root and directory-style URLs never have a sibling to probe
        let relative = match path::resolve(ctx.path) {
            Some(p) if !p.as_os_str().is_empty() && !path::has_trailing_separator(ctx.path) => {
                p
            }
            _ => return self.files.serve(ctx, false).await,
        };
        let gz_path = self.files.root().join(path::gzip_sibling(&relative));

        let (mut file, len) = match open_regular(&gz_path).await {
            Ok(Some(found)) => found,
            Ok(None) => return self.files.serve(ctx, false).await,
            Err(e) if is_missing(&e) => return self.files.serve(ctx, false).await,
            Err(e) => return server_error_response(&gz_path, &e),
        };

        match read_all(&mut file, len).await {
            Ok(data) => {
                logger::log_debug(&format!(
                    "Serving {} ({} bytes gzip)",
                    gz_path.display(),
                    data.len()
                ));
                let content_type = mime::guess_content_type(&relative);
                http::build_encoded_response(data, content_type, GZIP_ENCODING)
            }
            Err(e) => server_error_response(&gz_path, &e),
        }
    }
}
