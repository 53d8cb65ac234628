use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::HashMap;

/// A catalog entry: one curated website with its preview video.
///
/// Records are created by an external ingestion pipeline; this service only
/// ever increments the view counter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Website {
    /// Opaque document-style id, stable for the record's lifetime
    pub id: String,
    pub name: String,
    pub video_url: String,
    pub website_url: String,
    pub created_at: DateTime<Utc>,
    /// Monotonically non-decreasing view counter
    pub views: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_with: Option<String>,
    /// Platform name -> profile URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<Json<HashMap<String, String>>>,
}

/// Sort order for feed queries. Popularity is derived from the view counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Latest,
    Popular,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Latest => "latest",
            SortOrder::Popular => "popular",
        }
    }
}

/// One category label with the number of websites carrying it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryCount {
    pub name: String,
    pub count: i64,
}

/// Minimal projection used by the sitemap generator
#[derive(Debug, Clone, FromRow)]
pub struct SitemapRow {
    pub id: String,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page of query results together with the continuation token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsitePage {
    pub records: Vec<Website>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<PageCursor>,
}

/// Opaque continuation token, produced and consumed only by the store.
///
/// Scoped to the (category, sort) query it was issued for; presenting it
/// against a different query is rejected as bad input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(pub String);

impl PageCursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
