//! Request path resolution and content types

use std::path::{Path, PathBuf};

/// File served for directory requests
pub const INDEX_FILE: &str = "index.html";

/// Why a request path could not be mapped to a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path tries to escape the root (or is otherwise malformed)
    Forbidden,
    /// No such file under the root
    NotFound,
}

/// Map a request URL onto a file under `root`
///
/// Query strings and fragments are ignored, segments are percent-decoded,
/// `..` is rejected and directories resolve to their `index.html`.
pub fn resolve_path(root: &Path, url: &str) -> Result<PathBuf, PathError> {
    let path = url.split(['?', '#']).next().unwrap_or_default();

    let mut resolved = root.to_path_buf();
    for raw in path.split('/') {
        let segment = urlencoding::decode(raw).map_err(|_| PathError::Forbidden)?;
        match segment.as_ref() {
            "" | "." => continue,
            ".." => return Err(PathError::Forbidden),
            s if s.contains(['/', '\\', '\0']) => return Err(PathError::Forbidden),
            s => resolved.push(s),
        }
    }

    if resolved.is_dir() {
        resolved.push(INDEX_FILE);
    }
    if !resolved.is_file() {
        return Err(PathError::NotFound);
    }

    // Symlinks must not lead outside the root either
    let canonical_root = root.canonicalize().map_err(|_| PathError::NotFound)?;
    let canonical = resolved.canonicalize().map_err(|_| PathError::NotFound)?;
    if !canonical.starts_with(&canonical_root) {
        return Err(PathError::Forbidden);
    }

    Ok(resolved)
}

/// MIME type for a file, by extension
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("wgsl") | Some("txt") => "text/plain; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("wav") => "audio/wav",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets").join("space ship.png"), [0u8; 4]).unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs").join("index.html"), "docs").unwrap();
        dir
    }

    #[test]
    fn test_root_serves_index() {
        let dir = site();
        let path = resolve_path(dir.path(), "/").unwrap();
        assert_eq!(path, dir.path().join("index.html"));
    }

    #[test]
    fn test_subdirectory_index() {
        let dir = site();
        let path = resolve_path(dir.path(), "/docs/").unwrap();
        assert_eq!(path, dir.path().join("docs").join("index.html"));
    }

    #[test]
    fn test_percent_decoding_and_query() {
        let dir = site();
        let path = resolve_path(dir.path(), "/assets/space%20ship.png?v=3#top").unwrap();
        assert_eq!(path, dir.path().join("assets").join("space ship.png"));
    }

    #[test]
    fn test_traversal_rejected() {
        let dir = site();
        assert_eq!(
            resolve_path(dir.path(), "/../etc/passwd"),
            Err(PathError::Forbidden)
        );
        assert_eq!(
            resolve_path(dir.path(), "/assets/%2e%2e/%2e%2e/secret"),
            Err(PathError::Forbidden)
        );
        assert_eq!(
            resolve_path(dir.path(), "/assets%2f..%2f..%2fsecret"),
            Err(PathError::Forbidden)
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = site();
        assert_eq!(
            resolve_path(dir.path(), "/nope.js"),
            Err(PathError::NotFound)
        );
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type(Path::new("a/index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("pkg/game_bg.wasm")), "application/wasm");
        assert_eq!(content_type(Path::new("game.JS")), "text/javascript; charset=utf-8");
        assert_eq!(content_type(Path::new("assets/explosion.mp3")), "audio/mpeg");
        assert_eq!(content_type(Path::new("LICENSE")), "application/octet-stream");
    }
}
