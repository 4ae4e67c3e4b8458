//! News sources.
//!
//! | Source         | Module         | Method            | Notes                         |
//! |----------------|----------------|-------------------|-------------------------------|
//! | tagesschau.de  | [`tagesschau`] | JSON homepage API | Nationwide + regional feeds   |
//!
//! A source exposes `latest_news(...)`, returning the selected items and the
//! JSON string that is handed to the model as tool output.

pub mod tagesschau;
