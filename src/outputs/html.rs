//! Static HTML page output.
//!
//! The page embeds the markdown summary in a single-quoted JavaScript string
//! and lets [marked](https://marked.js.org) render it in the browser:
//!
//! ```text
//! marked.parse('<escaped summary>')
//! ```
//!
//! Only `'` and newlines are escaped. This is not a general sanitizer.

use crate::utils::ensure_parent_dir;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub const MARKED_CDN: &str = "https://cdn.jsdelivr.net/npm/marked/marked.min.js";

/// Escape `text` for use inside a single-quoted JavaScript string literal.
pub fn escape_for_js_single_quoted(text: &str) -> String {
    text.replace('\'', "\\'").replace('\n', "\\n")
}

/// Render the full page for a markdown summary.
pub fn render_page(summary: &str, title: &str) -> String {
    let content = escape_for_js_single_quoted(summary);
    format!(
        r#"
<!doctype html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>{title}</title>
</head>
<body>
  <div id="content"></div>
  <script src="{MARKED_CDN}"></script>
  <script>
    document.getElementById('content').innerHTML =
      marked.parse('{content}');
  </script>
</body>
</html>
"#
    )
}

/// Write the page to `path`, creating parent directories as needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_page(path: &Path, html: &str) -> std::io::Result<()> {
    ensure_parent_dir(path).await?;
    fs::write(path, html).await?;
    info!(bytes = html.len(), "Wrote HTML page");
    Ok(())
}
