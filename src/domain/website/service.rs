use super::error::WebsiteServiceError;
use super::model::{CategoryCount, Website};
use super::store::WebsiteStore;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

pub struct WebsiteService {
    store: Arc<dyn WebsiteStore>,
    /// At-most-once guard for view counting, keyed by (viewer, website id).
    /// Stands in for the client-side "already recorded" flag of a detail
    /// view's lifetime.
    recorded_views: Cache<(String, String), ()>,
}

impl WebsiteService {
    pub fn new(store: Arc<dyn WebsiteStore>, view_dedup_ttl: Duration) -> Self {
        Self {
            store,
            recorded_views: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(view_dedup_ttl)
                .build(),
        }
    }
}

#[async_trait]
pub trait WebsiteServiceApi: Send + Sync {
    async fn get_website(&self, id: &str) -> Result<Website, WebsiteServiceError>;

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, WebsiteServiceError>;

    /// Fire-and-forget view-count increment. Never fails: store errors are
    /// logged and swallowed. With a viewer key, at most one increment is
    /// recorded per (viewer, website) within the dedup window.
    async fn record_view(&self, viewer: Option<&str>, id: &str);
}

#[async_trait]
impl WebsiteServiceApi for WebsiteService {
    async fn get_website(&self, id: &str) -> Result<Website, WebsiteServiceError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or(WebsiteServiceError::NotFound)
    }

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, WebsiteServiceError> {
        Ok(self.store.category_counts().await?)
    }

    async fn record_view(&self, viewer: Option<&str>, id: &str) {
        if let Some(viewer) = viewer {
            let key = (viewer.to_string(), id.to_string());
            if self.recorded_views.contains_key(&key) {
                tracing::debug!(website_id = %id, "View already recorded for viewer, skipping");
                return;
            }
            self.recorded_views.insert(key, ()).await;
        }

        let store = self.store.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            if let Err(e) = store.increment_views(&id).await {
                tracing::warn!(website_id = %id, error = %e, "Failed to increment view count");
            }
        });
    }
}
