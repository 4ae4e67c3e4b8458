//! Utility functions for string manipulation and file system operations.

use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes, on a character boundary,
/// with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure the parent directory of `path` exists.
///
/// Paths without a parent component (a bare file name) need nothing.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await?;
            debug!(dir = %parent.display(), "Output directory ready");
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        let s = "Über Ärger";
        // "Ü" is two bytes; cutting at 1 must not split it
        assert_eq!(truncate_for_log(s, 1), format!("…(+{} bytes)", s.len()));
        assert!(truncate_for_log(s, 3).starts_with("Üb"));
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("public/nested/news.html");
        ensure_parent_dir(&target).await.unwrap();
        assert!(tmp.path().join("public/nested").is_dir());
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_bare_file_name() {
        ensure_parent_dir(Path::new("news.html")).await.unwrap();
    }
}
