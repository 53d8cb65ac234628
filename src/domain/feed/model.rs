use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::website::{SortOrder, Website};

/// Lifecycle of a feed between fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedPhase {
    Idle,
    LoadingInitial,
    LoadingMore,
    Error,
}

/// Presentation-facing view of a feed: everything a list UI with an
/// infinite-scroll trigger needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub items: Vec<Website>,
    pub phase: FeedPhase,
    pub exhausted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub sort: SortOrder,
}

/// Request to open a feed session or re-point an existing one
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FeedQueryRequest {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: Option<SortOrder>,
}

/// Response for feed session endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedSessionResponse {
    pub session_id: Uuid,
    pub state: FeedSnapshot,
}
