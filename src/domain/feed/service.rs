use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::error::FeedServiceError;
use super::loader::{FeedLoader, PageRequest};
use super::model::FeedSnapshot;
use crate::domain::website::{SortOrder, WebsiteStore};

type SharedLoader = Arc<Mutex<FeedLoader>>;

/// Server-held feed sessions: one loader per (client, category, sort) view.
///
/// Sessions are evicted after sitting idle for the configured TTL; a request
/// against an evicted session answers not-found and the client opens a new
/// one.
pub struct FeedSessionService {
    store: Arc<dyn WebsiteStore>,
    sessions: Cache<Uuid, SharedLoader>,
    page_size: u32,
}

impl FeedSessionService {
    pub fn new(store: Arc<dyn WebsiteStore>, page_size: u32, session_ttl: Duration) -> Self {
        Self {
            store,
            sessions: Cache::builder()
                .max_capacity(50_000)
                .time_to_idle(session_ttl)
                .build(),
            page_size,
        }
    }

    async fn session(&self, session_id: Uuid) -> Result<SharedLoader, FeedServiceError> {
        self.sessions
            .get(&session_id)
            .await
            .ok_or(FeedServiceError::SessionNotFound)
    }

    /// Run one tagged fetch and feed the outcome back into the loader.
    ///
    /// The store call is awaited with the session lock released, so a reset
    /// issued meanwhile can supersede this request; the loader then discards
    /// the result by its stale tag.
    async fn run_fetch(&self, loader: &SharedLoader, request: PageRequest) {
        let result = self
            .store
            .query(
                request.category.as_deref(),
                request.sort,
                request.page_size,
                request.cursor.as_ref(),
            )
            .await;

        let mut guard = loader.lock().await;
        match result {
            Ok(page) => guard.apply_page(&request, page.records, page.next_cursor),
            Err(e) => {
                tracing::warn!(error = %e, tag = request.tag, "Feed page fetch failed");
                guard.apply_error(&request, e.to_string());
            }
        }
    }
}

#[async_trait]
pub trait FeedSessionApi: Send + Sync {
    /// Open a session and perform its initial load. Store failures surface
    /// as `phase = error` in the returned state, not as a service error.
    async fn create_session(
        &self,
        category: Option<String>,
        sort: SortOrder,
    ) -> Result<(Uuid, FeedSnapshot), FeedServiceError>;

    async fn snapshot(&self, session_id: Uuid) -> Result<FeedSnapshot, FeedServiceError>;

    /// Fetch the next page. A no-op (current state returned unchanged) while
    /// a load is in flight or once the feed is exhausted.
    async fn load_more(&self, session_id: Uuid) -> Result<FeedSnapshot, FeedServiceError>;

    /// Re-point the session at a new (category, sort) query and reload from
    /// scratch, superseding any in-flight fetch.
    async fn reset(
        &self,
        session_id: Uuid,
        category: Option<String>,
        sort: SortOrder,
    ) -> Result<FeedSnapshot, FeedServiceError>;
}

#[async_trait]
impl FeedSessionApi for FeedSessionService {
    async fn create_session(
        &self,
        category: Option<String>,
        sort: SortOrder,
    ) -> Result<(Uuid, FeedSnapshot), FeedServiceError> {
        let session_id = Uuid::new_v4();
        let (loader, request) = FeedLoader::new(category, sort, self.page_size);
        let loader = Arc::new(Mutex::new(loader));
        self.sessions.insert(session_id, loader.clone()).await;

        self.run_fetch(&loader, request).await;

        let snapshot = loader.lock().await.snapshot();
        tracing::debug!(%session_id, items = snapshot.items.len(), "Feed session created");
        Ok((session_id, snapshot))
    }

    async fn snapshot(&self, session_id: Uuid) -> Result<FeedSnapshot, FeedServiceError> {
        let loader = self.session(session_id).await?;
        let snapshot = loader.lock().await.snapshot();
        Ok(snapshot)
    }

    async fn load_more(&self, session_id: Uuid) -> Result<FeedSnapshot, FeedServiceError> {
        let loader = self.session(session_id).await?;

        let request = loader.lock().await.load_more();
        if let Some(request) = request {
            self.run_fetch(&loader, request).await;
        }

        let snapshot = loader.lock().await.snapshot();
        Ok(snapshot)
    }

    async fn reset(
        &self,
        session_id: Uuid,
        category: Option<String>,
        sort: SortOrder,
    ) -> Result<FeedSnapshot, FeedServiceError> {
        let loader = self.session(session_id).await?;

        let request = loader.lock().await.reset(category, sort);
        self.run_fetch(&loader, request).await;

        let snapshot = loader.lock().await.snapshot();
        Ok(snapshot)
    }
}
