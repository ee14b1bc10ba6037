//! MIME type detection module
//!
//! Maps a file extension to the `Content-Type` sent with it. For
//! precompressed assets the lookup is done on the uncompressed name, so
//! `app.js.gz` is announced as JavaScript.

use std::path::Path;

/// Sent for unknown or missing extensions
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const CONTENT_TYPES: &[(&str, &str)] = &[
    // Documents and scripts
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("js", "application/javascript"),
    ("mjs", "application/javascript"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("webmanifest", "application/manifest+json"),
    ("xml", "application/xml"),
    ("txt", "text/plain; charset=utf-8"),
    ("md", "text/markdown; charset=utf-8"),
    ("csv", "text/csv; charset=utf-8"),
    // Compiled artifacts
    ("wasm", "application/wasm"),
    ("pck", "application/octet-stream"),
    ("bin", "application/octet-stream"),
    ("data", "application/octet-stream"),
    // Images
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    // Fonts
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    // Audio and video
    ("mp3", "audio/mpeg"),
    ("ogg", "audio/ogg"),
    ("wav", "audio/wav"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    // Archives
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("tar", "application/x-tar"),
];

/// Guess the content type of `path` from its final extension
pub fn guess_content_type(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(lookup)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

fn lookup(ext: &str) -> Option<&'static str> {
    CONTENT_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, content_type)| *content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_assets() {
        assert_eq!(
            guess_content_type(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            guess_content_type(Path::new("app.js")),
            "application/javascript"
        );
        assert_eq!(
            guess_content_type(Path::new("index.wasm")),
            "application/wasm"
        );
        assert_eq!(
            guess_content_type(Path::new("style.css")),
            "text/css; charset=utf-8"
        );
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(guess_content_type(Path::new("LOGO.PNG")), "image/png");
    }

    #[test]
    fn test_only_final_extension_counts() {
        assert_eq!(
            guess_content_type(Path::new("app.js.gz")),
            "application/gzip"
        );
        assert_eq!(
            guess_content_type(Path::new("assets/app.min.js")),
            "application/javascript"
        );
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(guess_content_type(Path::new("blob.xyz")), DEFAULT_CONTENT_TYPE);
        assert_eq!(guess_content_type(Path::new("Makefile")), DEFAULT_CONTENT_TYPE);
    }
}
