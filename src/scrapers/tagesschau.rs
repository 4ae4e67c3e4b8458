//! tagesschau.de homepage feed.
//!
//! The homepage API (`https://www.tagesschau.de/api2u/homepage`) serves one
//! JSON document with two arrays: `news` (nationwide) and `regional` (items
//! of the federal states, tagged with a `regionId`).
//!
//! # Selection
//!
//! 1. Regional items are kept only for the configured region identifiers.
//! 2. Within each category, breaking items come first.
//! 3. Regional items come before nationwide items.
//! 4. The list is cut from the end until its JSON form fits the byte budget.

use crate::error::FetchError;
use crate::models::{Homepage, NewsItem, RawNewsItem};
use crate::utils::truncate_for_log;
use itertools::Itertools;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Items ready for the model, together with their serialized form.
#[derive(Debug, Clone)]
pub struct LatestNews {
    pub items: Vec<NewsItem>,
    pub json: String,
}

/// Fetch and decode the homepage document.
///
/// # Errors
///
/// Transport failures, non-success statuses and bodies that are not a JSON
/// object with array-valued `news` / `regional` keys.
#[instrument(level = "info", skip(client))]
pub async fn fetch_homepage(client: &Client, endpoint: &str) -> Result<Homepage, FetchError> {
    let response = client.get(endpoint).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status { status });
    }

    let body = response.text().await?;
    let homepage: Homepage = serde_json::from_str(&body).map_err(|e| {
        warn!(error = %e, body = %truncate_for_log(&body, 200), "Undecodable news payload");
        FetchError::Decode(e.to_string())
    })?;

    info!(
        news = homepage.news.len(),
        regional = homepage.regional.len(),
        bytes = body.len(),
        "Fetched homepage"
    );
    Ok(homepage)
}

/// Normalize one upstream item.
///
/// Items missing a required field, or carrying one of the wrong type,
/// degrade to [`NewsItem::default`].
pub fn normalize(raw: &Value) -> NewsItem {
    let parsed = match RawNewsItem::deserialize(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(error = %e, "Item failed to parse; using empty record");
            return NewsItem::default();
        }
    };

    let Some(link) = parsed.detailsweb.or(parsed.link) else {
        debug!(title = %parsed.title, "Item has no link; using empty record");
        return NewsItem::default();
    };

    NewsItem {
        title: parsed.title,
        content: parsed
            .content
            .into_iter()
            .filter(|segment| segment.kind == "text")
            .filter_map(|segment| segment.value)
            .join("\n"),
        breaking_news: parsed.breakingNews,
        link,
        region_id: parsed.regionId,
        tags: parsed.tags.into_iter().map(|t| t.tag).collect(),
    }
}

/// Stable partition: breaking items first, original order otherwise.
fn breaking_first(items: Vec<NewsItem>) -> Vec<NewsItem> {
    items
        .into_iter()
        .sorted_by_key(|item| !item.breaking_news)
        .collect()
}

/// Build the ordered item list from a homepage document.
pub fn select_items(homepage: &Homepage, regions: &[u32]) -> Vec<NewsItem> {
    let regional = homepage
        .regional
        .iter()
        .map(normalize)
        .filter(|item| item.region_id.is_some_and(|id| regions.contains(&id)))
        .collect();
    let nationwide = homepage.news.iter().map(normalize).collect();

    let mut items = breaking_first(regional);
    let regional_count = items.len();
    items.extend(breaking_first(nationwide));
    debug!(
        regional = regional_count,
        nationwide = items.len() - regional_count,
        degraded = items.iter().filter(|item| item.is_empty()).count(),
        "Selected items"
    );
    items
}

/// Drop items from the end until the serialized list fits `max_bytes`.
///
/// Returns the kept items and their JSON. An empty list serializes to `[]`.
pub fn truncate_to_budget(
    mut items: Vec<NewsItem>,
    max_bytes: usize,
) -> Result<(Vec<NewsItem>, String), FetchError> {
    let mut json = serde_json::to_string(&items)?;
    let before = items.len();
    while json.len() > max_bytes && items.pop().is_some() {
        json = serde_json::to_string(&items)?;
    }
    if items.len() < before {
        info!(
            dropped = before - items.len(),
            kept = items.len(),
            bytes = json.len(),
            max_bytes,
            "Truncated news list to size budget"
        );
    }
    Ok((items, json))
}

/// Fetch, select and truncate: everything the model gets to see.
#[instrument(level = "info", skip(client, regions))]
pub async fn latest_news(
    client: &Client,
    endpoint: &str,
    regions: &[u32],
    max_bytes: usize,
) -> Result<LatestNews, FetchError> {
    let homepage = fetch_homepage(client, endpoint).await?;
    let items = select_items(&homepage, regions);
    let (items, json) = truncate_to_budget(items, max_bytes)?;
    info!(count = items.len(), bytes = json.len(), "Prepared news for summarizer");
    Ok(LatestNews { items, json })
}
