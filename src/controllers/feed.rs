use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::feed::{
    FeedQueryRequest, FeedSessionApi, FeedSessionResponse, FeedSessionService, FeedSnapshot,
};
use crate::error::AppResult;

pub struct FeedController {
    feed_service: Arc<FeedSessionService>,
}

impl FeedController {
    pub fn new(feed_service: Arc<FeedSessionService>) -> Self {
        Self { feed_service }
    }

    /// POST /api/feeds - Open a feed session and perform the initial load
    pub async fn create_feed(
        State(controller): State<Arc<FeedController>>,
        Json(request): Json<FeedQueryRequest>,
    ) -> AppResult<(StatusCode, Json<FeedSessionResponse>)> {
        let (session_id, state) = controller
            .feed_service
            .create_session(request.category, request.sort.unwrap_or_default())
            .await?;
        Ok((
            StatusCode::CREATED,
            Json(FeedSessionResponse { session_id, state }),
        ))
    }

    /// GET /api/feeds/{sessionId} - Current feed state
    pub async fn get_feed(
        State(controller): State<Arc<FeedController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<FeedSnapshot>> {
        let state = controller.feed_service.snapshot(session_id).await?;
        Ok(Json(state))
    }

    /// POST /api/feeds/{sessionId}/more - Fetch the next page (no-op while
    /// loading or exhausted)
    pub async fn load_more(
        State(controller): State<Arc<FeedController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<FeedSnapshot>> {
        let state = controller.feed_service.load_more(session_id).await?;
        Ok(Json(state))
    }

    /// PUT /api/feeds/{sessionId} - Re-point the session at a new query
    pub async fn reset_feed(
        State(controller): State<Arc<FeedController>>,
        Path(session_id): Path<Uuid>,
        Json(request): Json<FeedQueryRequest>,
    ) -> AppResult<Json<FeedSnapshot>> {
        let state = controller
            .feed_service
            .reset(session_id, request.category, request.sort.unwrap_or_default())
            .await?;
        Ok(Json(state))
    }
}
