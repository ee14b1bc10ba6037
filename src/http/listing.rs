//! Directory listing rendering

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fs::FileType;
use std::io;
use std::path::Path;
use tokio::fs;

use crate::logger;

/// Characters escaped in listing hrefs
const HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One row of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Name as shown: directories end in `/`, symlinks in `@`
    fn display_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else if self.is_symlink {
            format!("{}@", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Link target; symlinked directories still get a trailing slash
    fn link_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Read the entries of `dir`, sorted case-insensitively by name.
///
/// Entries whose type cannot be read are left out of the listing.
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(listed) = describe(&path, name, entry.file_type().await).await {
            entries.push(listed);
        }
    }

    entries.sort_by_key(|e| e.name.to_lowercase());
    Ok(entries)
}

async fn describe(
    path: &Path,
    name: String,
    file_type: io::Result<FileType>,
) -> Option<ListingEntry> {
    let file_type = match file_type {
        Ok(t) => t,
        Err(e) => {
            logger::log_warning(&format!(
                "Skipping '{}' in listing: {e}",
                path.display()
            ));
            return None;
        }
    };

    let is_symlink = file_type.is_symlink();
    let is_dir = if is_symlink {
        fs::metadata(path).await.is_ok_and(|m| m.is_dir())
    } else {
        file_type.is_dir()
    };
    Some(ListingEntry {
        name,
        is_dir,
        is_symlink,
    })
}

/// Render the HTML page for `url_path` (already decoded)
pub fn render(url_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(url_path));
    let mut html = format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );

    for entry in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            utf8_percent_encode(&entry.link_name(), HREF),
            escape_html(&entry.display_name()),
        ));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_render_marks_kinds() {
        let html = render(
            "/assets/",
            &[
                entry("css", true, false),
                entry("latest", false, true),
                entry("app.js", false, false),
            ],
        );
        assert!(html.contains("<title>Directory listing for /assets/</title>"));
        assert!(html.contains("<a href=\"css/\">css/</a>"));
        assert!(html.contains("<a href=\"latest\">latest@</a>"));
        assert!(html.contains("<a href=\"app.js\">app.js</a>"));
    }

    #[test]
    fn test_render_escapes_names() {
        let html = render("/", &[entry("a <b>&c.txt", false, false)]);
        assert!(html.contains("href=\"a%20%3Cb%3E%26c.txt\""));
        assert!(html.contains(">a &lt;b&gt;&amp;c.txt<"));
    }

    #[tokio::test]
    async fn test_read_entries_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), b"b").unwrap();
        std::fs::write(dir.path().join("A.txt"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("c")).unwrap();

        let entries = read_entries(dir.path()).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A.txt", "b.txt", "c"]);
        assert!(entries[2].is_dir);
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ghost");
        let denied = Err(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(describe(&path, "ghost".to_string(), denied).await.is_none());

        std::fs::create_dir(&path).unwrap();
        let file_type = std::fs::symlink_metadata(&path).map(|m| m.file_type());
        let listed = describe(&path, "ghost".to_string(), file_type).await.unwrap();
        assert!(listed.is_dir);
        assert!(!listed.is_symlink);
    }
}
