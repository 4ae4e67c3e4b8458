//! Output generation.
//!
//! # Submodules
//!
//! - [`html`]: Renders the summary into a static page and writes it
//!
//! # Output Structure
//!
//! ```text
//! public/
//! ├── news.html        # standard profile
//! ├── news_lite.html   # lite profile
//! └── news_debug.html  # debug profile
//! ```

pub mod html;
