use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::website::{
    CategoryCount, PageCursor, SortOrder, Website, WebsitePage, WebsiteService,
    WebsiteServiceApi, WebsiteStore,
};
use crate::error::AppResult;

const X_VIEWER_ID: &str = "x-viewer-id";
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct ListWebsitesQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: Option<SortOrder>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub cursor: Option<String>,
}

pub struct WebsiteController {
    website_service: Arc<WebsiteService>,
    store: Arc<dyn WebsiteStore>,
    default_page_size: u32,
}

impl WebsiteController {
    pub fn new(
        website_service: Arc<WebsiteService>,
        store: Arc<dyn WebsiteStore>,
        default_page_size: u32,
    ) -> Self {
        Self {
            website_service,
            store,
            default_page_size,
        }
    }

    /// GET /api/websites - One page of the catalog, stateless pass-through
    /// to the store for clients that keep their own feed state
    pub async fn list_websites(
        State(controller): State<Arc<WebsiteController>>,
        Query(query): Query<ListWebsitesQuery>,
    ) -> AppResult<Json<WebsitePage>> {
        let page_size = query
            .page_size
            .unwrap_or(controller.default_page_size)
            .clamp(1, MAX_PAGE_SIZE);
        let cursor = query.cursor.map(PageCursor);

        let page = controller
            .store
            .query(
                query.category.as_deref(),
                query.sort.unwrap_or_default(),
                page_size,
                cursor.as_ref(),
            )
            .await?;
        Ok(Json(page))
    }

    /// GET /api/websites/{id} - Detail lookup
    pub async fn get_website(
        State(controller): State<Arc<WebsiteController>>,
        Path(id): Path<String>,
    ) -> AppResult<Json<Website>> {
        let website = controller.website_service.get_website(&id).await?;
        Ok(Json(website))
    }

    /// POST /api/websites/{id}/view - Fire-and-forget view count. Always
    /// 202; increment failures are logged and swallowed.
    pub async fn record_view(
        State(controller): State<Arc<WebsiteController>>,
        Path(id): Path<String>,
        headers: HeaderMap,
    ) -> StatusCode {
        let viewer = headers
            .get(X_VIEWER_ID)
            .and_then(|value| value.to_str().ok());
        controller.website_service.record_view(viewer, &id).await;
        StatusCode::ACCEPTED
    }

    /// GET /api/categories - Category labels with website counts
    pub async fn get_categories(
        State(controller): State<Arc<WebsiteController>>,
    ) -> AppResult<Json<Vec<CategoryCount>>> {
        let counts = controller.website_service.category_counts().await?;
        Ok(Json(counts))
    }
}
