use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;

use crate::AppState;

/// GET /metrics — Prometheus scrape payload. Carries the auth and market
/// counters (`auth_success_total`, `auth_rejected_total`,
/// `markets_created_total`, `markets_activated_total`) registered at startup.
pub async fn render(State(state): State<AppState>) -> impl IntoResponse {
    let payload = state.metrics_handle.render();
    ([(CONTENT_TYPE, "text/plain; version=0.0.4")], payload)
}
