//! Static file serving module
//!
//! Generic serving of the document root: regular files, directory
//! redirects, index files and listings. Files are opened first and
//! inspected through the open handle, never checked by name beforehand.

use crate::handler::RequestContext;
use crate::http::{self, listing, mime, path, FileResponse};
use crate::logger;
use hyper::body::Bytes;
use percent_encoding::percent_decode_str;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Generic file server rooted at one directory
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    index_files: Vec<String>,
    directory_listing: bool,
}

impl StaticFiles {
    pub const fn new(root: PathBuf, index_files: Vec<String>, directory_listing: bool) -> Self {
        Self {
            root,
            index_files,
            directory_listing,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve the request path; with `is_head` only the headers are produced
    pub async fn serve(&self, ctx: &RequestContext<'_>, is_head: bool) -> FileResponse {
        let Some(relative) = path::resolve(ctx.path) else {
            return http::build_404_response();
        };
        let full_path = self.root.join(relative);

        let file = match File::open(&full_path).await {
            Ok(f) => f,
            Err(e) => return io_error_response(&full_path, &e),
        };
        let metadata = match file.metadata().await {
            Ok(m) => m,
            Err(e) => return io_error_response(&full_path, &e),
        };

        if metadata.is_dir() {
            drop(file);
            return self.serve_directory(ctx, &full_path, is_head).await;
        }

        // A file addressed like a directory, or a fifo/socket/device
        if path::has_trailing_separator(ctx.path) || !metadata.is_file() {
            return http::build_404_response();
        }

        send_file(file, metadata.len(), &full_path, is_head).await
    }

    async fn serve_directory(
        &self,
        ctx: &RequestContext<'_>,
        dir: &Path,
        is_head: bool,
    ) -> FileResponse {
        if !path::has_trailing_separator(ctx.path) {
            return http::build_redirect_response(&directory_location(ctx));
        }

        for index_file in &self.index_files {
            let candidate = dir.join(index_file);
            match open_regular(&candidate).await {
                Ok(Some((file, len))) => return send_file(file, len, &candidate, is_head).await,
                Ok(None) => {}
                Err(e) if is_missing(&e) => {}
                Err(e) => return io_error_response(&candidate, &e),
            }
        }

        if !self.directory_listing {
            return http::build_403_response();
        }

        match listing::read_entries(dir).await {
            Ok(entries) => {
                let display_path = percent_decode_str(ctx.path).decode_utf8_lossy();
                http::build_html_response(listing::render(&display_path, &entries), is_head)
            }
            Err(e) => {
                logger::log_warning(&format!(
                    "Cannot list directory '{}': {e}",
                    dir.display()
                ));
                http::build_403_response()
            }
        }
    }
}

/// Open `path` and return the handle with its size if it is a regular file.
///
/// `Ok(None)` means the path exists but names something else (a directory).
pub async fn open_regular(path: &Path) -> io::Result<Option<(File, u64)>> {
    let file = File::open(path).await?;
    let metadata = file.metadata().await?;
    Ok(metadata.is_file().then(|| (file, metadata.len())))
}

/// Read an open file to the end
pub async fn read_all(file: &mut File, size_hint: u64) -> io::Result<Bytes> {
    let mut data = Vec::with_capacity(usize::try_from(size_hint).unwrap_or(0));
    file.read_to_end(&mut data).await?;
    Ok(Bytes::from(data))
}

/// Whether an open error means "nothing servable here"
pub fn is_missing(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

/// Map a filesystem error to the response for this request only
pub fn io_error_response(path: &Path, err: &io::Error) -> FileResponse {
    if is_missing(err) {
        return http::build_404_response();
    }
    if err.kind() == ErrorKind::PermissionDenied {
        logger::log_warning(&format!("Permission denied: '{}'", path.display()));
        return http::build_403_response();
    }
    server_error_response(path, err)
}

/// Log an unexpected filesystem error and answer 500
pub fn server_error_response(path: &Path, err: &io::Error) -> FileResponse {
    logger::log_error(&format!("Failed to read '{}': {err}", path.display()));
    http::build_500_response()
}

async fn send_file(mut file: File, len: u64, path: &Path, is_head: bool) -> FileResponse {
    let content_type = mime::guess_content_type(path);
    if is_head {
        return http::build_head_response(content_type, len);
    }

    match read_all(&mut file, len).await {
        Ok(data) => http::build_file_response(data, content_type),
        Err(e) => server_error_response(path, &e),
    }
}

/// Redirect target adding the trailing slash; leading slashes are collapsed
/// so `//host` cannot turn into a protocol-relative URL.
fn directory_location(ctx: &RequestContext<'_>) -> String {
    let path = ctx.path.trim_start_matches('/');
    match ctx.query {
        Some(query) => format!("/{path}/?{query}"),
        None => format!("/{path}/"),
    }
}
