use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Request-level failures. Each variant maps to a stable machine-readable
/// error code; the JSON shape is always `{ok: false, error: <code>}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("init data verification failed")]
    InvalidInitData,

    #[error("init data user has no telegram id")]
    NoTelegramId,

    #[error("missing or malformed Authorization header")]
    NoToken,

    #[error("token verification failed")]
    InvalidToken,

    #[error("authenticated user not found in directory")]
    UserNotFound,

    #[error("role does not permit this operation")]
    Forbidden,

    #[error("question is empty")]
    QuestionRequired,

    #[error("resolution_ts is not a valid ISO-8601 datetime")]
    BadResolutionTs,

    #[error("market not found")]
    MarketNotFound,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),

    #[error("internal error: {0}")]
    Internal(anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInitData => "invalid_init_data",
            AppError::NoTelegramId => "no_telegram_id",
            AppError::NoToken => "no_token",
            AppError::InvalidToken => "invalid_token",
            AppError::UserNotFound => "user_not_found",
            AppError::Forbidden => "forbidden",
            AppError::QuestionRequired => "question_required",
            AppError::BadResolutionTs => "bad_resolution_ts",
            AppError::MarketNotFound => "not_found",
            AppError::Storage(_) => "db_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInitData | AppError::NoToken | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NoTelegramId | AppError::QuestionRequired | AppError::BadResolutionTs => {
                StatusCode::BAD_REQUEST
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::MarketNotFound => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Storage(e) => tracing::error!("Storage error: {e:?}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ => {}
        }

        (
            self.status(),
            Json(ErrorBody {
                ok: false,
                error: self.code().into(),
            }),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Storage(e.into())
    }
}
