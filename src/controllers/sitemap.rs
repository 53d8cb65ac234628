use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::domain::sitemap::SitemapService;

const CACHE_ONE_DAY: &str = "public, max-age=86400";

pub struct SitemapController {
    sitemap_service: Arc<SitemapService>,
}

impl SitemapController {
    pub fn new(sitemap_service: Arc<SitemapService>) -> Self {
        Self { sitemap_service }
    }

    /// GET /sitemap.xml
    pub async fn sitemap_xml(
        State(controller): State<Arc<SitemapController>>,
    ) -> impl IntoResponse {
        let entries = controller.sitemap_service.entries().await;
        let xml = controller.sitemap_service.render_xml(&entries);
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/xml"),
                (header::CACHE_CONTROL, CACHE_ONE_DAY),
            ],
            xml,
        )
    }

    /// GET /robots.txt
    pub async fn robots_txt(
        State(controller): State<Arc<SitemapController>>,
    ) -> impl IntoResponse {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain"),
                (header::CACHE_CONTROL, CACHE_ONE_DAY),
            ],
            controller.sitemap_service.robots_txt(),
        )
    }
}
