//! Request path resolution
//!
//! Turns the URL path of a request into a path relative to the document
//! root. The result never contains `..`, so joining it onto the root cannot
//! leave the root.

use percent_encoding::percent_decode_str;
use std::path::PathBuf;

/// Suffix of precompressed siblings
pub const GZIP_SUFFIX: &str = ".gz";

/// Resolve a URL path (without query string) to a root-relative path.
///
/// Percent escapes are decoded, the leading separator is dropped, empty and
/// `.` segments are skipped and `..` pops the previous segment. Returns
/// `None` for paths that can never name a file (embedded NUL or backslash).
pub fn resolve(url_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(url_path).decode_utf8_lossy();

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains(['\0', '\\']) => return None,
            s => segments.push(s),
        }
    }

    Some(segments.iter().collect())
}

/// Whether the URL path addresses a directory, i.e. its decoded form ends
/// in `/` (so `%2F` counts as a separator).
pub fn has_trailing_separator(url_path: &str) -> bool {
    percent_decode_str(url_path)
        .decode_utf8_lossy()
        .ends_with('/')
}

/// Append `.gz` to the final component of `path`
pub fn gzip_sibling(path: &std::path::Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(GZIP_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_strips_leading_separator() {
        assert_eq!(resolve("/index.wasm").unwrap(), Path::new("index.wasm"));
        assert_eq!(resolve("/js/app.js").unwrap(), Path::new("js/app.js"));
    }

    #[test]
    fn test_root_is_empty() {
        assert_eq!(resolve("/").unwrap(), Path::new(""));
        assert_eq!(resolve("").unwrap(), Path::new(""));
    }

    #[test]
    fn test_decodes_percent_escapes() {
        assert_eq!(
            resolve("/my%20file.txt").unwrap(),
            Path::new("my file.txt")
        );
    }

    #[test]
    fn test_parent_segments_cannot_escape() {
        assert_eq!(resolve("/../../etc/passwd").unwrap(), Path::new("etc/passwd"));
        assert_eq!(resolve("/a/b/../c").unwrap(), Path::new("a/c"));
        assert_eq!(resolve("/%2e%2e/secret").unwrap(), Path::new("secret"));
        assert_eq!(resolve("/./a//b/").unwrap(), Path::new("a/b"));
    }

    #[test]
    fn test_rejects_unservable_segments() {
        assert!(resolve("/a%00b").is_none());
        assert!(resolve("/..%5c..%5cwin.ini").is_none());
    }

    #[test]
    fn test_trailing_separator_is_checked_after_decoding() {
        assert!(has_trailing_separator("/"));
        assert!(has_trailing_separator("/assets/"));
        assert!(has_trailing_separator("/a.js%2F"));
        assert!(has_trailing_separator("/a.js%2f"));
        assert!(!has_trailing_separator("/a.js"));
        // Dot segments normalize away and do not mark a directory
        assert!(!has_trailing_separator("/a.js/."));
    }

    #[test]
    fn test_gzip_sibling() {
        assert_eq!(
            gzip_sibling(Path::new("index.wasm")),
            Path::new("index.wasm.gz")
        );
        assert_eq!(
            gzip_sibling(Path::new("js/app.min.js")),
            Path::new("js/app.min.js.gz")
        );
    }
}
