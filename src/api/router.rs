use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Mini App frontends are served from Telegram's webview, so the default
    // is permissive CORS; ALLOWED_ORIGINS narrows it for direct deployments.
    let cors = if state.config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render))
        // Telegram auth
        .route("/auth/telegram", post(handlers::auth::telegram))
        .route("/auth/me", get(handlers::auth::me))
        // Markets
        .route("/markets", get(handlers::markets::list).post(handlers::markets::create))
        .route("/markets/activate/:id", post(handlers::markets::activate))
        // TON
        .route("/ton/wallet/:address/balance", get(handlers::ton::balance))
        .route("/ton/transfer", post(handlers::ton::transfer))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
