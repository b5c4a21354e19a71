use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Market, MarketStatus};

/// Fixed page size for listings; always the most recent page, no cursor.
const LIST_LIMIT: i64 = 100;

/// Optional filters for the public market listing.
#[derive(Debug, Default, Clone)]
pub struct MarketFilter {
    /// Exact status match, compared as the stored string.
    pub status: Option<String>,
    /// Exact category match. `None` (or the `"all"` sentinel upstream) means no filter.
    pub category: Option<String>,
    /// Case-insensitive substring match against the question text.
    pub search: Option<String>,
}

/// Fields for a new market. Status is decided by the caller from the
/// creator's role: admins go straight to active, creators start pending.
#[derive(Debug, Clone)]
pub struct NewMarket {
    pub question: String,
    pub category: Option<String>,
    pub status: MarketStatus,
    pub resolution_ts: Option<DateTime<Utc>>,
    pub creator_telegram_id: i64,
    pub logo_url: Option<String>,
    pub resolution_source: Option<String>,
}

/// List markets newest-first, honoring the optional filters.
pub async fn list_markets(pool: &PgPool, filter: &MarketFilter) -> anyhow::Result<Vec<Market>> {
    // Escape LIKE metacharacters so the search term is a literal substring,
    // not a pattern: `search=%` must only match questions containing '%'.
    let search = filter.search.as_deref().map(escape_like);

    let markets = sqlx::query_as::<_, Market>(
        r#"
        SELECT * FROM markets
        WHERE ($1::text IS NULL OR status = $1)
          AND ($2::text IS NULL OR category = $2)
          AND ($3::text IS NULL OR question ILIKE '%' || $3 || '%' ESCAPE '\')
        ORDER BY created_at DESC
        LIMIT $4
        "#,
    )
    .bind(&filter.status)
    .bind(&filter.category)
    .bind(&search)
    .bind(LIST_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(markets)
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Insert a market. Probability and volume start at their schema defaults
/// (50.0 / 0); no engine recomputes them.
pub async fn create_market(pool: &PgPool, new: &NewMarket) -> anyhow::Result<Market> {
    let market = sqlx::query_as::<_, Market>(
        r#"
        INSERT INTO markets
            (question, category, status, resolution_ts, creator_telegram_id, logo_url, resolution_source)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&new.question)
    .bind(&new.category)
    .bind(new.status)
    .bind(new.resolution_ts)
    .bind(new.creator_telegram_id)
    .bind(&new.logo_url)
    .bind(&new.resolution_source)
    .fetch_one(pool)
    .await?;

    Ok(market)
}

/// Transition a market to active. Idempotent: an already-active market is
/// updated to the same status and still counts as success. Returns `None`
/// when the id does not exist.
pub async fn activate_market(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Market>> {
    let market = sqlx::query_as::<_, Market>(
        r#"
        UPDATE markets
        SET status = 'active', updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(market)
}

/// Fetch a single market by id.
pub async fn get_market_by_id(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Market>> {
    let market = sqlx::query_as::<_, Market>(
        "SELECT * FROM markets WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(market)
}
