use crate::helpers;

use futures::future::join_all;
use helpers::store::MemoryStore;
use helpers::{fixtures, TestContext};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn item_ids(state: &Value) -> Vec<String> {
    state["items"]
        .as_array()
        .expect("items should be an array")
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn it_should_page_through_the_feed_until_exhausted() {
    // 17 records, page size 12: one full page, then a short one
    let ctx = TestContext::new(fixtures::seed(17, None)).await.unwrap();

    let response = ctx.client.post("/api/feeds", &json!({})).await.unwrap();
    response.assert_status(StatusCode::CREATED);
    let body = response.json();
    let session_id = body["session_id"].as_str().expect("Missing session_id");
    let state = &body["state"];

    assert_eq!(state["phase"], "idle");
    assert_eq!(state["exhausted"], false);
    assert_eq!(item_ids(state).len(), 12);
    // Latest first
    assert_eq!(item_ids(state)[0], "site-016");

    let response = ctx
        .client
        .post_empty(&format!("/api/feeds/{session_id}/more"))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    let state = response.json();
    assert_eq!(item_ids(state).len(), 17);
    assert_eq!(state["exhausted"], true);

    // Exhausted: another load-more is a no-op
    let response = ctx
        .client
        .post_empty(&format!("/api/feeds/{session_id}/more"))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    let state = response.json();
    assert_eq!(item_ids(state).len(), 17);
    assert_eq!(state["phase"], "idle");
}

#[tokio::test]
async fn it_should_answer_an_empty_exhausted_feed_for_an_empty_catalog() {
    let ctx = TestContext::new(vec![]).await.unwrap();

    let response = ctx.client.post("/api/feeds", &json!({})).await.unwrap();
    response.assert_status(StatusCode::CREATED);
    let state = &response.json()["state"];

    assert_eq!(state["items"], json!([]));
    assert_eq!(state["exhausted"], true);
    assert_eq!(state["phase"], "idle");
    assert!(state.get("error").is_none());
}

#[tokio::test]
async fn it_should_sort_by_popularity_when_asked() {
    let ctx = TestContext::new(fixtures::seed(5, None)).await.unwrap();

    let response = ctx
        .client
        .post("/api/feeds", &json!({"sort": "popular"}))
        .await
        .unwrap();
    response.assert_status(StatusCode::CREATED);
    let state = &response.json()["state"];

    // views are (i * 37) % 100: 0, 37, 74, 11, 48
    assert_eq!(
        item_ids(state),
        vec!["site-002", "site-004", "site-001", "site-003", "site-000"]
    );
    assert_eq!(state["sort"], "popular");
}

#[tokio::test]
async fn it_should_restart_from_scratch_when_the_query_changes() {
    let mut seed = fixtures::seed(10, Some("portfolio"));
    seed.extend((10..16).map(|i| fixtures::website(i, Some("ecommerce"))));
    let ctx = TestContext::new(seed).await.unwrap();

    let response = ctx
        .client
        .post("/api/feeds", &json!({"category": "portfolio"}))
        .await
        .unwrap();
    response.assert_status(StatusCode::CREATED);
    let body = response.json();
    let session_id = body["session_id"].as_str().unwrap();
    assert_eq!(item_ids(&body["state"]).len(), 10);

    let response = ctx
        .client
        .put(
            &format!("/api/feeds/{session_id}"),
            &json!({"category": "ecommerce"}),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    let state = response.json();

    let ids = item_ids(state);
    assert_eq!(ids.len(), 6);
    assert!(ids.iter().all(|id| {
        let n: usize = id.trim_start_matches("site-").parse().unwrap();
        n >= 10
    }));
    assert_eq!(state["category"], "ecommerce");
    assert_eq!(state["exhausted"], true);
}

#[tokio::test]
async fn it_should_issue_a_single_fetch_for_concurrent_load_more_calls() {
    // The store parks each query long enough for the second request to
    // arrive while the first fetch is still in flight
    let store = Arc::new(MemoryStore::with_query_delay(
        fixtures::seed(17, None),
        Duration::from_millis(200),
    ));
    let ctx = TestContext::with_store(store.clone()).await.unwrap();

    let response = ctx.client.post("/api/feeds", &json!({})).await.unwrap();
    response.assert_status(StatusCode::CREATED);
    let session_id = response.json()["session_id"]
        .as_str()
        .expect("Missing session_id")
        .to_string();

    let queries_before = store.query_count();
    let path = format!("/api/feeds/{session_id}/more");
    let responses = join_all(vec![
        ctx.client.post_empty(&path),
        ctx.client.post_empty(&path),
    ])
    .await;

    // Only one of the two calls reached the store; the loser was a no-op
    assert_eq!(store.query_count(), queries_before + 1);

    let mut item_counts = Vec::new();
    for response in responses {
        let response = response.unwrap();
        response.assert_status(StatusCode::OK);
        item_counts.push(item_ids(response.json()).len());
    }
    item_counts.sort();
    // The winning call merged the short second page; the no-op answered the
    // state it observed (still loading, or already merged)
    assert_eq!(item_counts[1], 17);
    assert!(item_counts[0] == 12 || item_counts[0] == 17);

    let response = ctx
        .client
        .get(&format!("/api/feeds/{session_id}"))
        .await
        .unwrap();
    let state = response.json();
    assert_eq!(item_ids(state).len(), 17);
    assert_eq!(state["exhausted"], true);
}

#[tokio::test]
async fn it_should_404_for_an_unknown_session() {
    let ctx = TestContext::new(vec![]).await.unwrap();

    let session_id = uuid::Uuid::new_v4();
    let response = ctx
        .client
        .get(&format!("/api/feeds/{session_id}"))
        .await
        .unwrap();
    response.assert_status(StatusCode::NOT_FOUND);

    let response = ctx
        .client
        .post_empty(&format!("/api/feeds/{session_id}/more"))
        .await
        .unwrap();
    response.assert_status(StatusCode::NOT_FOUND);
}
