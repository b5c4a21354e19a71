use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::auth::AuthUser;
use crate::db::market_repo::{self, MarketFilter, NewMarket};
use crate::errors::AppError;
use crate::models::{Market, MarketStatus, Role};
use crate::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct CreateMarketRequest {
    #[serde(default)]
    pub question: String,
    pub category: Option<String>,
    pub resolution_ts: Option<String>,
    pub logo_url: Option<String>,
    pub resolution_source: Option<String>,
}

#[derive(Serialize)]
pub struct MarketsResponse {
    pub ok: bool,
    pub markets: Vec<Market>,
}

#[derive(Serialize)]
pub struct MarketResponse {
    pub ok: bool,
    pub market: Market,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /markets — public listing, newest first, capped at one page.
pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<MarketsResponse>, AppError> {
    let filter = MarketFilter {
        status: q.status.filter(|s| !s.is_empty()),
        // "all" is the frontend's no-filter sentinel
        category: q.category.filter(|c| !c.is_empty() && c != "all"),
        search: q.search.filter(|s| !s.is_empty()),
    };

    let markets = market_repo::list_markets(&state.db, &filter).await?;

    Ok(Json(MarketsResponse { ok: true, markets }))
}

/// POST /markets — create a market; requires role creator or admin.
/// Admin-created markets skip moderation and start active.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Option<Json<CreateMarketRequest>>,
) -> Result<(StatusCode, Json<MarketResponse>), AppError> {
    if user.role < Role::Creator {
        return Err(AppError::Forbidden);
    }

    // Unparsable bodies collapse to an empty request and fail validation
    // below, so every rejection keeps the `{ok, error}` shape.
    let body = payload.map(|Json(b)| b).unwrap_or_default();

    let question = body.question.trim();
    if question.is_empty() {
        return Err(AppError::QuestionRequired);
    }

    let resolution_ts = match body.resolution_ts.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            Some(parse_resolution_ts(raw).ok_or(AppError::BadResolutionTs)?)
        }
        _ => None,
    };

    let status = if user.role == Role::Admin {
        MarketStatus::Active
    } else {
        MarketStatus::Pending
    };

    let market = market_repo::create_market(
        &state.db,
        &NewMarket {
            question: question.to_string(),
            category: body.category,
            status,
            resolution_ts,
            creator_telegram_id: user.telegram_id,
            logo_url: body.logo_url,
            resolution_source: body.resolution_source,
        },
    )
    .await?;

    counter!("markets_created_total").increment(1);
    tracing::info!(market_id = %market.id, creator = user.telegram_id, status = %market.status, "market created");

    Ok((StatusCode::CREATED, Json(MarketResponse { ok: true, market })))
}

/// POST /markets/activate/{id} — admin only. Idempotent: activating an
/// already-active market succeeds with status unchanged.
pub async fn activate(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MarketResponse>, AppError> {
    if user.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    let market = market_repo::activate_market(&state.db, id)
        .await?
        .ok_or(AppError::MarketNotFound)?;

    counter!("markets_activated_total").increment(1);
    tracing::info!(market_id = %market.id, admin = user.telegram_id, "market activated");

    Ok(Json(MarketResponse { ok: true, market }))
}

/// Accepts RFC 3339 (`2026-01-01T00:00:00Z`), bare ISO-8601 without an
/// offset (`2026-01-01T00:00:00`), and a date alone (`2026-01-01`, read as
/// midnight UTC) — the shapes the frontend sends.
fn parse_resolution_ts(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|n| n.and_utc()))
        .or_else(|| {
            raw.parse::<NaiveDate>()
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        })
}
