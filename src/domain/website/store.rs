use async_trait::async_trait;

use super::model::{CategoryCount, PageCursor, SitemapRow, SortOrder, Website, WebsitePage};
use crate::error::AppResult;

/// Contract with the backing website catalog.
///
/// The production implementation lives in
/// `infrastructure::repositories::WebsiteRepository`; tests inject scripted
/// in-memory stores.
#[async_trait]
pub trait WebsiteStore: Send + Sync {
    /// Fetch one page for a (category, sort) query, continuing after
    /// `after_cursor` when given. The returned cursor is `None` when the
    /// store has no position to continue from (empty page).
    async fn query(
        &self,
        category: Option<&str>,
        sort: SortOrder,
        page_size: u32,
        after_cursor: Option<&PageCursor>,
    ) -> AppResult<WebsitePage>;

    async fn get_by_id(&self, id: &str) -> AppResult<Option<Website>>;

    /// Bump the view counter. Callers treat this as best-effort telemetry.
    async fn increment_views(&self, id: &str) -> AppResult<()>;

    async fn category_counts(&self) -> AppResult<Vec<CategoryCount>>;

    async fn list_for_sitemap(&self) -> AppResult<Vec<SitemapRow>>;
}
