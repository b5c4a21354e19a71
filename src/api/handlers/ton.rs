use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::ton::TonError;
use crate::AppState;

/// GET /ton/wallet/{address}/balance — proxy an upstream balance lookup.
/// Any upstream non-200 surfaces as 502 with the upstream status and body.
pub async fn balance(State(state): State<AppState>, Path(address): Path<String>) -> Response {
    match state.ton.get_balance(&address).await {
        Ok(balance) => Json(json!({
            "ok": true,
            "address": address,
            "balance": balance,
        }))
        .into_response(),

        Err(TonError::Upstream { status, body }) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "ok": false, "status": status, "body": body })),
        )
            .into_response(),

        Err(e) => {
            tracing::error!("TON balance lookup failed: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "ok": false, "error": "upstream_error" })),
            )
                .into_response()
        }
    }
}

/// POST /ton/transfer — mock passthrough, no real transfer is made.
pub async fn transfer(payload: Option<Json<Value>>) -> Json<Value> {
    let received = payload.map(|Json(v)| v).unwrap_or_else(|| json!({}));

    Json(json!({
        "ok": true,
        "mode": "mock",
        "received": received,
    }))
}
