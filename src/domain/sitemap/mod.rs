use chrono::{SecondsFormat, Utc};
use std::sync::Arc;

use crate::domain::website::WebsiteStore;

/// Static routes with crawl hints, most important first
const STATIC_ROUTES: &[(&str, &str, &str)] = &[
    ("/", "1.0", "daily"),
    ("/browse", "0.9", "daily"),
    ("/about", "0.7", "monthly"),
    ("/contact", "0.7", "monthly"),
    ("/privacy", "0.5", "yearly"),
    ("/terms", "0.5", "yearly"),
];

#[derive(Debug, Clone)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: String,
    pub priority: &'static str,
    pub changefreq: &'static str,
}

/// Builds the sitemap from the store's listing endpoint plus the static and
/// category routes. Pure glue; store failures degrade to the routes that can
/// be produced without it.
pub struct SitemapService {
    store: Arc<dyn WebsiteStore>,
    base_url: String,
}

impl SitemapService {
    pub fn new(store: Arc<dyn WebsiteStore>, base_url: String) -> Self {
        Self {
            store,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn entries(&self) -> Vec<SitemapEntry> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut entries: Vec<SitemapEntry> = STATIC_ROUTES
            .iter()
            .map(|(path, priority, changefreq)| SitemapEntry {
                url: (*path).to_string(),
                last_modified: now.clone(),
                priority,
                changefreq,
            })
            .collect();

        match self.store.category_counts().await {
            Ok(counts) => {
                entries.extend(counts.into_iter().map(|c| SitemapEntry {
                    url: format!("/category/{}", category_slug(&c.name)),
                    last_modified: now.clone(),
                    priority: "0.8",
                    changefreq: "daily",
                }));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping category sitemap entries");
            }
        }

        match self.store.list_for_sitemap().await {
            Ok(rows) => {
                entries.extend(rows.into_iter().map(|row| SitemapEntry {
                    url: format!("/websites/{}", row.id),
                    last_modified: row
                        .updated_at
                        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                        .unwrap_or_else(|| now.clone()),
                    priority: "0.8",
                    changefreq: "weekly",
                }));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping website sitemap entries");
            }
        }

        entries
    }

    pub fn render_xml(&self, entries: &[SitemapEntry]) -> String {
        let urls: String = entries
            .iter()
            .map(|entry| {
                format!(
                    "  <url>\n    <loc>{base}{path}</loc>\n    <lastmod>{lastmod}</lastmod>\n    <changefreq>{changefreq}</changefreq>\n    <priority>{priority}</priority>\n  </url>\n",
                    base = self.base_url,
                    path = entry.url,
                    lastmod = entry.last_modified,
                    changefreq = entry.changefreq,
                    priority = entry.priority,
                )
            })
            .collect();

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{urls}</urlset>\n"
        )
    }

    pub fn robots_txt(&self) -> String {
        format!(
            "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n",
            self.base_url
        )
    }
}

/// URL-friendly category slug: lowercase, whitespace collapsed to dashes
pub fn category_slug(name: &str) -> String {
    let dashed = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    urlencoding::encode(&dashed).into_owned()
}
