use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::token;
use crate::db::user_repo;
use crate::errors::AppError;
use crate::models::User;
use crate::AppState;

/// Resolved identity for a request carrying `Authorization: Bearer <token>`.
///
/// The token only proves who the caller is; the User row (and with it the
/// current role) is re-read from the directory on every request. Role
/// requirements are enforced per operation in the handlers, not here.
pub struct AuthUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::NoToken)?;

        let token = header.strip_prefix("Bearer ").ok_or(AppError::NoToken)?;

        let claims = token::verify(token, &state.config.jwt_secret).map_err(|e| {
            tracing::debug!("token rejected: {e}");
            AppError::InvalidToken
        })?;

        let user = user_repo::get_user_by_telegram_id(&state.db, claims.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok(AuthUser(user))
    }
}
