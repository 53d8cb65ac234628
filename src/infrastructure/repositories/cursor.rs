use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::website::{PageCursor, SortOrder, Website};
use crate::error::{AppError, AppResult};

/// Keyset position of the last record of a page, under a given sort
#[derive(Debug, Clone, PartialEq)]
pub enum Keyset {
    /// (created_at, id) of the last record, for recency order
    CreatedAt(DateTime<Utc>, String),
    /// (views, id) of the last record, for popularity order
    Views(i64, String),
}

#[derive(Debug, Serialize, Deserialize)]
struct CursorPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    sort: SortOrder,
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    views: Option<i64>,
}

/// Opaque cursor encoding: url-safe base64 over a JSON payload carrying the
/// query scope and the keyset. The format can evolve without breaking
/// clients; nothing outside this module looks inside a cursor.
pub struct CursorCodec;

impl CursorCodec {
    pub fn encode(category: Option<&str>, sort: SortOrder, last: &Website) -> PageCursor {
        let payload = CursorPayload {
            category: category.map(str::to_string),
            sort,
            id: last.id.clone(),
            created_at: matches!(sort, SortOrder::Latest).then_some(last.created_at),
            views: matches!(sort, SortOrder::Popular).then_some(last.views),
        };
        // Serializing a plain struct of scalars cannot fail
        let json = serde_json::to_vec(&payload).unwrap_or_default();
        PageCursor(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decode and validate a cursor against the query it is presented for.
    /// A cursor issued for another (category, sort) scope is bad input.
    pub fn decode(
        cursor: &PageCursor,
        category: Option<&str>,
        sort: SortOrder,
    ) -> AppResult<Keyset> {
        let bytes = URL_SAFE_NO_PAD
            .decode(cursor.as_str())
            .map_err(|e| AppError::BadRequest(format!("Invalid cursor: {e}")))?;
        let payload: CursorPayload = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::BadRequest(format!("Invalid cursor: {e}")))?;

        if payload.category.as_deref() != category || payload.sort != sort {
            return Err(AppError::BadRequest(
                "Cursor does not match the requested query".to_string(),
            ));
        }

        match sort {
            SortOrder::Latest => payload
                .created_at
                .map(|t| Keyset::CreatedAt(t, payload.id.clone()))
                .ok_or_else(|| AppError::BadRequest("Invalid cursor: missing keyset".into())),
            SortOrder::Popular => payload
                .views
                .map(|v| Keyset::Views(v, payload.id.clone()))
                .ok_or_else(|| AppError::BadRequest("Invalid cursor: missing keyset".into())),
        }
    }
}
