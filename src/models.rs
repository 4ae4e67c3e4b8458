//! Data models for the news feed and its normalized representation.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Homepage`]: The raw payload served by the tagesschau.de homepage API
//! - [`RawNewsItem`]: One upstream item as delivered by the API
//! - [`NewsItem`]: The normalized record handed to the language model
//!
//! The normalized record uses camelCase field names on the wire to stay close
//! to the upstream vocabulary the model sees in the tool output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The homepage payload.
///
/// Both arrays are kept as raw JSON values so that a single malformed item
/// can be degraded on its own instead of failing the whole document.
#[derive(Debug, Default, Deserialize)]
pub struct Homepage {
    /// Nationwide news items.
    #[serde(default)]
    pub news: Vec<Value>,
    /// News items of the federal states, each tagged with a `regionId`.
    #[serde(default)]
    pub regional: Vec<Value>,
}

/// One typed segment of an item's body.
#[derive(Debug, Deserialize)]
pub struct ContentSegment {
    /// Segment kind, e.g. `"text"`, `"headline"`, `"image_gallery"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Segment payload; only present on textual segments.
    #[serde(default)]
    pub value: Option<String>,
}

/// A tag attached to an upstream item.
#[derive(Debug, Deserialize)]
pub struct RawTag {
    pub tag: String,
}

/// A news item as delivered by the API.
///
/// `title`, `content` and `breakingNews` are required, as is one of
/// `detailsweb` / `link`. Anything else is optional.
#[allow(non_snake_case)]
#[derive(Debug, Deserialize)]
pub struct RawNewsItem {
    pub title: String,
    pub content: Vec<ContentSegment>,
    pub breakingNews: bool,
    #[serde(default)]
    pub detailsweb: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
    #[serde(default)]
    pub regionId: Option<u32>,
}

/// A normalized news item.
///
/// The default value is the "empty record" that malformed upstream items
/// degrade to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// Headline of the item.
    pub title: String,
    /// Text segments of the body, joined by newlines.
    pub content: String,
    /// Whether the upstream source flags the item as breaking news.
    pub breaking_news: bool,
    /// Link to the article on the web.
    pub link: String,
    /// Federal state the item belongs to, for regional items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<u32>,
    /// Topic tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl NewsItem {
    /// `true` for the degraded empty record.
    pub fn is_empty(&self) -> bool {
        *self == NewsItem::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_item_serialization_uses_camel_case() {
        let item = NewsItem {
            title: "Bundestag".to_string(),
            content: "Text".to_string(),
            breaking_news: true,
            link: "https://www.tagesschau.de/a".to_string(),
            region_id: Some(2),
            tags: vec!["Politik".to_string()],
        };

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"breakingNews\":true"));
        assert!(json.contains("\"regionId\":2"));
        assert!(json.contains("\"tags\":[\"Politik\"]"));
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let item = NewsItem {
            title: "Wetter".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Wetter","content":"","breakingNews":false,"link":""}"#
        );
    }

    #[test]
    fn test_default_record_is_empty() {
        assert!(NewsItem::default().is_empty());
        let item = NewsItem {
            breaking_news: true,
            ..Default::default()
        };
        assert!(!item.is_empty());
    }

    #[test]
    fn test_homepage_missing_keys_default_to_empty() {
        let homepage: Homepage = serde_json::from_str("{}").unwrap();
        assert!(homepage.news.is_empty());
        assert!(homepage.regional.is_empty());
    }

    #[test]
    fn test_raw_item_requires_breaking_flag() {
        let json = r#"{"title": "T", "content": [], "detailsweb": "https://x"}"#;
        assert!(serde_json::from_str::<RawNewsItem>(json).is_err());
    }
}
