use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use gallery_backend::domain::website::{
    CategoryCount, PageCursor, SitemapRow, SortOrder, Website, WebsitePage, WebsiteStore,
};
use gallery_backend::error::AppResult;
use gallery_backend::infrastructure::repositories::cursor::{CursorCodec, Keyset};

/// In-memory website store with the same keyset-pagination contract as the
/// Postgres repository, including the shared opaque cursor codec.
pub struct MemoryStore {
    websites: Mutex<Vec<Website>>,
    query_delay: Option<Duration>,
    queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new(seed: Vec<Website>) -> Self {
        Self {
            websites: Mutex::new(seed),
            query_delay: None,
            queries: AtomicUsize::new(0),
        }
    }

    /// Store whose `query` parks for `delay`, to hold a fetch in flight
    /// while other requests arrive.
    pub fn with_query_delay(seed: Vec<Website>, delay: Duration) -> Self {
        Self {
            query_delay: Some(delay),
            ..Self::new(seed)
        }
    }

    /// Number of `query` calls served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn views_of(&self, id: &str) -> Option<i64> {
        self.websites
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.views)
    }
}

fn in_category(website: &Website, category: Option<&str>) -> bool {
    match category {
        None => true,
        Some(category) => website
            .categories
            .as_ref()
            .map(|cats| cats.iter().any(|c| c == category))
            .unwrap_or(false),
    }
}

#[async_trait]
impl WebsiteStore for MemoryStore {
    async fn query(
        &self,
        category: Option<&str>,
        sort: SortOrder,
        page_size: u32,
        after_cursor: Option<&PageCursor>,
    ) -> AppResult<WebsitePage> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.query_delay {
            tokio::time::sleep(delay).await;
        }

        let after = after_cursor
            .map(|cursor| CursorCodec::decode(cursor, category, sort))
            .transpose()?;

        let mut matching: Vec<Website> = self
            .websites
            .lock()
            .unwrap()
            .iter()
            .filter(|w| in_category(w, category))
            .cloned()
            .collect();

        match sort {
            SortOrder::Latest => {
                matching.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)))
            }
            SortOrder::Popular => {
                matching.sort_by(|a, b| (b.views, &b.id).cmp(&(a.views, &a.id)))
            }
        }

        let records: Vec<Website> = matching
            .into_iter()
            .filter(|w| match &after {
                None => true,
                Some(Keyset::CreatedAt(t, id)) => (w.created_at, w.id.clone()) < (*t, id.clone()),
                Some(Keyset::Views(v, id)) => (w.views, w.id.clone()) < (*v, id.clone()),
            })
            .take(page_size as usize)
            .collect();

        let next_cursor = records
            .last()
            .map(|last| CursorCodec::encode(category, sort, last));

        Ok(WebsitePage {
            records,
            next_cursor,
        })
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<Website>> {
        Ok(self
            .websites
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id == id)
            .cloned())
    }

    async fn increment_views(&self, id: &str) -> AppResult<()> {
        if let Some(website) = self
            .websites
            .lock()
            .unwrap()
            .iter_mut()
            .find(|w| w.id == id)
        {
            website.views += 1;
        }
        Ok(())
    }

    async fn category_counts(&self) -> AppResult<Vec<CategoryCount>> {
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for website in self.websites.lock().unwrap().iter() {
            if let Some(categories) = &website.categories {
                for category in categories {
                    *counts.entry(category.clone()).or_insert(0) += 1;
                }
            }
        }
        Ok(counts
            .into_iter()
            .map(|(name, count)| CategoryCount { name, count })
            .collect())
    }

    async fn list_for_sitemap(&self) -> AppResult<Vec<SitemapRow>> {
        Ok(self
            .websites
            .lock()
            .unwrap()
            .iter()
            .map(|w| SitemapRow {
                id: w.id.clone(),
                updated_at: Some(w.created_at),
            })
            .collect())
    }
}
