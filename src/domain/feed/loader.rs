use std::collections::HashSet;

use crate::domain::website::{PageCursor, SortOrder, Website};

use super::model::{FeedPhase, FeedSnapshot};

/// A tagged page fetch the caller must perform against the store.
///
/// The tag binds the request to the (category, sort) query it was issued
/// for. `apply_page`/`apply_error` discard results whose tag no longer
/// matches the in-flight request, so a slow fetch for a superseded query
/// can never clobber the state of the query that replaced it.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub tag: u64,
    pub category: Option<String>,
    pub sort: SortOrder,
    pub page_size: u32,
    pub cursor: Option<PageCursor>,
}

/// Pagination state machine for one (category, sort) feed.
///
/// Performs no I/O itself: `reset`/`load_more` hand back the request to run,
/// and the outcome is fed back through `apply_page`/`apply_error`. At most
/// one request is outstanding at a time, enforced by the phase guard.
pub struct FeedLoader {
    category: Option<String>,
    sort: SortOrder,
    page_size: u32,
    items: Vec<Website>,
    seen: HashSet<String>,
    cursor: Option<PageCursor>,
    exhausted: bool,
    phase: FeedPhase,
    error: Option<String>,
    next_tag: u64,
    in_flight: Option<u64>,
}

impl FeedLoader {
    /// Create a loader and its initial page request.
    pub fn new(
        category: Option<String>,
        sort: SortOrder,
        page_size: u32,
    ) -> (Self, PageRequest) {
        let mut loader = Self {
            category: None,
            sort,
            page_size,
            items: Vec::new(),
            seen: HashSet::new(),
            cursor: None,
            exhausted: false,
            phase: FeedPhase::Idle,
            error: None,
            next_tag: 0,
            in_flight: None,
        };
        let request = loader.reset(category, sort);
        (loader, request)
    }

    /// Restart the feed for a (possibly new) query. Clears items and cursor
    /// up front (the fresh page replaces rather than appends), supersedes any
    /// in-flight fetch, and returns the fresh initial request.
    pub fn reset(&mut self, category: Option<String>, sort: SortOrder) -> PageRequest {
        self.category = category;
        self.sort = sort;
        self.items.clear();
        self.seen.clear();
        self.cursor = None;
        self.exhausted = false;
        self.error = None;
        self.phase = FeedPhase::LoadingInitial;
        self.issue()
    }

    /// Request the next page. Returns `None` (no fetch) while a load is in
    /// flight or once the feed is exhausted; an errored feed may retry.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        if matches!(self.phase, FeedPhase::LoadingInitial | FeedPhase::LoadingMore) {
            return None;
        }
        if self.exhausted {
            return None;
        }
        self.error = None;
        self.phase = FeedPhase::LoadingMore;
        Some(self.issue())
    }

    fn issue(&mut self) -> PageRequest {
        self.next_tag += 1;
        self.in_flight = Some(self.next_tag);
        PageRequest {
            tag: self.next_tag,
            category: self.category.clone(),
            sort: self.sort,
            page_size: self.page_size,
            cursor: self.cursor.clone(),
        }
    }

    fn is_stale(&self, request: &PageRequest) -> bool {
        self.in_flight != Some(request.tag)
    }

    /// Merge a fetched page into the feed. Results for superseded requests
    /// are discarded wholesale.
    pub fn apply_page(
        &mut self,
        request: &PageRequest,
        records: Vec<Website>,
        next_cursor: Option<PageCursor>,
    ) {
        if self.is_stale(request) {
            tracing::debug!(tag = request.tag, "Discarding stale page response");
            return;
        }
        self.in_flight = None;

        // Covers both "no results at all" and "no more results"
        if records.is_empty() {
            self.exhausted = true;
            self.phase = FeedPhase::Idle;
            return;
        }

        // A short page is taken to be the last one. When the true last page
        // is exactly full this under-triggers and the following empty fetch
        // settles it.
        if (records.len() as u64) < u64::from(request.page_size) {
            self.exhausted = true;
        }

        let fresh: Vec<Website> = records
            .into_iter()
            .filter(|record| !self.seen.contains(&record.id))
            .collect();

        if fresh.is_empty() {
            // Every record was already present: the store repeated a page
            // instead of signaling end-of-data.
            self.exhausted = true;
        } else {
            for record in &fresh {
                self.seen.insert(record.id.clone());
            }
            self.items.extend(fresh);
        }

        self.cursor = next_cursor;
        self.phase = FeedPhase::Idle;
    }

    /// Record a fetch failure. Items and cursor are kept; recovery is a
    /// later `load_more` or `reset`.
    pub fn apply_error(&mut self, request: &PageRequest, message: String) {
        if self.is_stale(request) {
            tracing::debug!(tag = request.tag, "Discarding stale page failure");
            return;
        }
        self.in_flight = None;
        self.error = Some(message);
        self.phase = FeedPhase::Error;
    }

    pub fn items(&self) -> &[Website] {
        &self.items
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            items: self.items.clone(),
            phase: self.phase,
            exhausted: self.exhausted,
            error: self.error.clone(),
            category: self.category.clone(),
            sort: self.sort,
        }
    }
}
