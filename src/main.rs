use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gallery_backend::controllers::feed::FeedController;
use gallery_backend::controllers::sitemap::SitemapController;
use gallery_backend::controllers::website::WebsiteController;
use gallery_backend::domain::feed::FeedSessionService;
use gallery_backend::domain::sitemap::SitemapService;
use gallery_backend::domain::website::{WebsiteService, WebsiteStore};
use gallery_backend::infrastructure::config::{Config, LogFormat};
use gallery_backend::infrastructure::db::{check_connection, create_pool};
use gallery_backend::infrastructure::http::start_http_server;
use gallery_backend::infrastructure::repositories::WebsiteRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Gallery Backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate the store (inject db pool)
    let store: Arc<dyn WebsiteStore> = Arc::new(WebsiteRepository::new(pool.clone()));

    // 2. Instantiate services (inject store)
    tracing::info!("Instantiating services...");
    let website_service = Arc::new(WebsiteService::new(
        store.clone(),
        Duration::from_secs(config.view_dedup_ttl_secs),
    ));
    let feed_service = Arc::new(FeedSessionService::new(
        store.clone(),
        config.page_size,
        Duration::from_secs(config.feed_session_ttl_secs),
    ));
    let sitemap_service = Arc::new(SitemapService::new(store.clone(), config.base_url.clone()));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let website_controller = Arc::new(WebsiteController::new(
        website_service,
        store.clone(),
        config.page_size,
    ));
    let feed_controller = Arc::new(FeedController::new(feed_service));
    let sitemap_controller = Arc::new(SitemapController::new(sitemap_service));

    // Start HTTP server with all routes
    start_http_server(
        pool,
        config,
        website_controller,
        feed_controller,
        sitemap_controller,
    )
    .await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "gallery_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "gallery_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
