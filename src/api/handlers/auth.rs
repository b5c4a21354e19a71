use axum::extract::State;
use axum::Json;
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::api::auth::AuthUser;
use crate::auth::{init_data, token};
use crate::db::user_repo;
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::AppState;

#[derive(Deserialize, Default)]
pub struct TelegramAuthRequest {
    /// `Telegram.WebApp.initData`, either snake or camel case.
    #[serde(default, alias = "initData")]
    pub init_data: String,
}

/// Public view of a user, keyed by the Telegram id the frontend knows.
#[derive(Serialize)]
pub struct UserBody {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
}

impl From<&User> for UserBody {
    fn from(u: &User) -> Self {
        Self {
            id: u.telegram_id,
            username: u.username.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            role: u.role,
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub ok: bool,
    pub user: UserBody,
    pub token: String,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub ok: bool,
    pub user: UserBody,
}

/// POST /auth/telegram — verify init-data, upsert the user, mint a token.
pub async fn telegram(
    State(state): State<AppState>,
    payload: Option<Json<TelegramAuthRequest>>,
) -> Result<Json<AuthResponse>, AppError> {
    // An unparsable or missing body is treated as an empty one; it then
    // fails verification like any other bad init-data, keeping the error
    // shape uniform instead of leaking the framework's parser message.
    let body = payload.map(|Json(b)| b).unwrap_or_default();

    let profile = init_data::verify_init_data(
        &body.init_data,
        &state.config.telegram_bot_token,
        state.config.auth_max_age_secs,
    )
    .map_err(|e| {
        counter!("auth_rejected_total").increment(1);
        tracing::debug!("init data rejected: {e}");
        AppError::InvalidInitData
    })?;

    let telegram_id = profile.id.ok_or(AppError::NoTelegramId)?;

    let user = user_repo::upsert_user(&state.db, telegram_id, &profile).await?;

    let token = token::issue(
        telegram_id,
        &state.config.jwt_secret,
        state.config.jwt_ttl_days,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("issuing session token: {e}")))?;

    counter!("auth_success_total").increment(1);
    tracing::info!(telegram_id, "user authenticated");

    Ok(Json(AuthResponse {
        ok: true,
        user: UserBody::from(&user),
        token,
    }))
}

/// GET /auth/me — identity behind the presented token, role included.
pub async fn me(AuthUser(user): AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        ok: true,
        user: UserBody::from(&user),
    })
}
