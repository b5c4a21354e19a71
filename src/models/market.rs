use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Market lifecycle status. Only `pending -> active` is reachable through the
/// API; `resolved` and `canceled` are stored but no endpoint transitions into
/// them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum MarketStatus {
    Pending,
    Active,
    Resolved,
    Canceled,
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketStatus::Pending => write!(f, "pending"),
            MarketStatus::Active => write!(f, "active"),
            MarketStatus::Resolved => write!(f, "resolved"),
            MarketStatus::Canceled => write!(f, "canceled"),
        }
    }
}

/// Database row for the markets table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Market {
    pub id: Uuid,
    pub question: String,
    pub category: Option<String>,
    pub status: MarketStatus,
    pub resolution_ts: Option<DateTime<Utc>>,
    pub creator_telegram_id: Option<i64>,
    pub prob_yes: Decimal,
    pub volume: Decimal,
    pub logo_url: Option<String>,
    pub resolution_source: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
