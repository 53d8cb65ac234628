pub mod request_id;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    feed::FeedController, health, sitemap::SitemapController, website::WebsiteController,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;
use request_id::request_id_middleware;

/// Routes shared between production and the integration test harness (which
/// mounts them over an in-memory store).
pub fn api_router(
    website_controller: Arc<WebsiteController>,
    feed_controller: Arc<FeedController>,
    sitemap_controller: Arc<SitemapController>,
) -> Router {
    let website_routes = Router::new()
        .route("/api/websites", get(WebsiteController::list_websites))
        .route("/api/websites/:id", get(WebsiteController::get_website))
        .route(
            "/api/websites/:id/view",
            post(WebsiteController::record_view),
        )
        .route("/api/categories", get(WebsiteController::get_categories))
        .with_state(website_controller);

    let feed_routes = Router::new()
        .route("/api/feeds", post(FeedController::create_feed))
        .route(
            "/api/feeds/:sessionId",
            get(FeedController::get_feed).put(FeedController::reset_feed),
        )
        .route("/api/feeds/:sessionId/more", post(FeedController::load_more))
        .with_state(feed_controller);

    let sitemap_routes = Router::new()
        .route("/sitemap.xml", get(SitemapController::sitemap_xml))
        .route("/robots.txt", get(SitemapController::robots_txt))
        .with_state(sitemap_controller);

    Router::new()
        .merge(website_routes)
        .merge(feed_routes)
        .merge(sitemap_routes)
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    pool: Arc<DbPool>,
    config: Arc<Config>,
    website_controller: Arc<WebsiteController>,
    feed_controller: Arc<FeedController>,
    sitemap_controller: Arc<SitemapController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool.clone())
        .merge(api_router(
            website_controller,
            feed_controller,
            sitemap_controller,
        ))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
