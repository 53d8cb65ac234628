use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::website::{
    CategoryCount, PageCursor, SitemapRow, SortOrder, Website, WebsitePage, WebsiteStore,
};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;

use super::cursor::{CursorCodec, Keyset};

const SELECT_COLUMNS: &str =
    "id, name, video_url, website_url, created_at, views, categories, built_with, social_links";

/// Postgres-backed website catalog with keyset pagination.
///
/// Pages are ordered by `(created_at, id)` or `(views, id)` descending; the
/// cursor carries the keyset of the previous page's last row.
pub struct WebsiteRepository {
    pool: Arc<DbPool>,
}

impl WebsiteRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    async fn query_latest(
        &self,
        category: Option<&str>,
        page_size: u32,
        after: Option<Keyset>,
    ) -> AppResult<Vec<Website>> {
        let pool = self.pool.as_ref();
        let websites = match after {
            Some(Keyset::CreatedAt(created_at, id)) => {
                sqlx::query_as::<_, Website>(&format!(
                    r#"
                    SELECT {SELECT_COLUMNS}
                    FROM websites
                    WHERE ($1::text IS NULL OR $1 = ANY(categories))
                      AND (created_at, id) < ($2, $3)
                    ORDER BY created_at DESC, id DESC
                    LIMIT $4
                    "#
                ))
                .bind(category)
                .bind(created_at)
                .bind(id)
                .bind(i64::from(page_size))
                .fetch_all(pool)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Website>(&format!(
                    r#"
                    SELECT {SELECT_COLUMNS}
                    FROM websites
                    WHERE ($1::text IS NULL OR $1 = ANY(categories))
                    ORDER BY created_at DESC, id DESC
                    LIMIT $2
                    "#
                ))
                .bind(category)
                .bind(i64::from(page_size))
                .fetch_all(pool)
                .await?
            }
        };
        Ok(websites)
    }

    async fn query_popular(
        &self,
        category: Option<&str>,
        page_size: u32,
        after: Option<Keyset>,
    ) -> AppResult<Vec<Website>> {
        let pool = self.pool.as_ref();
        let websites = match after {
            Some(Keyset::Views(views, id)) => {
                sqlx::query_as::<_, Website>(&format!(
                    r#"
                    SELECT {SELECT_COLUMNS}
                    FROM websites
                    WHERE ($1::text IS NULL OR $1 = ANY(categories))
                      AND (views, id) < ($2, $3)
                    ORDER BY views DESC, id DESC
                    LIMIT $4
                    "#
                ))
                .bind(category)
                .bind(views)
                .bind(id)
                .bind(i64::from(page_size))
                .fetch_all(pool)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Website>(&format!(
                    r#"
                    SELECT {SELECT_COLUMNS}
                    FROM websites
                    WHERE ($1::text IS NULL OR $1 = ANY(categories))
                    ORDER BY views DESC, id DESC
                    LIMIT $2
                    "#
                ))
                .bind(category)
                .bind(i64::from(page_size))
                .fetch_all(pool)
                .await?
            }
        };
        Ok(websites)
    }
}

#[async_trait]
impl WebsiteStore for WebsiteRepository {
    async fn query(
        &self,
        category: Option<&str>,
        sort: SortOrder,
        page_size: u32,
        after_cursor: Option<&PageCursor>,
    ) -> AppResult<WebsitePage> {
        let after = after_cursor
            .map(|cursor| CursorCodec::decode(cursor, category, sort))
            .transpose()?;

        let records = match sort {
            SortOrder::Latest => self.query_latest(category, page_size, after).await?,
            SortOrder::Popular => self.query_popular(category, page_size, after).await?,
        };

        let next_cursor = records
            .last()
            .map(|last| CursorCodec::encode(category, sort, last));

        Ok(WebsitePage {
            records,
            next_cursor,
        })
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<Website>> {
        let pool = self.pool.as_ref();
        let website = sqlx::query_as::<_, Website>(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM websites
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(website)
    }

    async fn increment_views(&self, id: &str) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE websites
            SET views = views + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn category_counts(&self) -> AppResult<Vec<CategoryCount>> {
        let pool = self.pool.as_ref();
        let counts = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT name, COUNT(*) AS count
            FROM (
                SELECT unnest(categories) AS name
                FROM websites
                WHERE categories IS NOT NULL
            ) AS labels
            GROUP BY name
            ORDER BY name
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(counts)
    }

    async fn list_for_sitemap(&self) -> AppResult<Vec<SitemapRow>> {
        let pool = self.pool.as_ref();
        let rows = sqlx::query_as::<_, SitemapRow>(
            r#"
            SELECT id, updated_at
            FROM websites
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
