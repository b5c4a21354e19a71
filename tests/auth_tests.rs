mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use tower::ServiceExt;

use truestake::models::Role;

fn auth_request(init_data: &str) -> Request<Body> {
    let body = serde_json::json!({ "init_data": init_data });
    Request::builder()
        .method("POST")
        .uri("/auth/telegram")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_auth_telegram_issues_token() {
    let (app, _pool) = common::build_test_app().await;

    let init_data = common::signed_init_data(
        r#"{"id":900001,"username":"alice","first_name":"Alice"}"#,
        Utc::now().timestamp(),
    );

    let resp = app
        .clone()
        .oneshot(auth_request(&init_data))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["user"]["id"], 900001);
    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["user"]["role"], "user");
    let token = json["token"].as_str().unwrap().to_string();

    // The issued token resolves back to the same user through /auth/me.
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["user"]["id"], 900001);
    assert_eq!(json["user"]["role"], "user");
}

#[tokio::test]
async fn test_auth_camel_case_init_data_key_accepted() {
    let (app, _pool) = common::build_test_app().await;

    let init_data = common::signed_init_data(r#"{"id":900002}"#, Utc::now().timestamp());
    let body = serde_json::json!({ "initData": init_data });

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/telegram")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_auth_tampered_hash_rejected() {
    let (app, pool) = common::build_test_app().await;

    let mut init_data =
        common::signed_init_data(r#"{"id":900003}"#, Utc::now().timestamp());
    let last = init_data.pop().unwrap();
    init_data.push(if last == '0' { '1' } else { '0' });

    let resp = app.oneshot(auth_request(&init_data)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let json = json_body(resp).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "invalid_init_data");

    // No user row was created for the forged payload.
    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM users WHERE telegram_id = 900003")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count.0, 0);
}

#[tokio::test]
async fn test_auth_stale_auth_date_rejected() {
    let (app, _pool) = common::build_test_app().await;

    // Two hours old, window is 600 seconds.
    let init_data =
        common::signed_init_data(r#"{"id":900004}"#, Utc::now().timestamp() - 7200);

    let resp = app.oneshot(auth_request(&init_data)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let json = json_body(resp).await;
    assert_eq!(json["error"], "invalid_init_data");
}

#[tokio::test]
async fn test_auth_user_without_id_is_bad_request() {
    let (app, _pool) = common::build_test_app().await;

    let init_data =
        common::signed_init_data(r#"{"username":"ghost"}"#, Utc::now().timestamp());

    let resp = app.oneshot(auth_request(&init_data)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = json_body(resp).await;
    assert_eq!(json["error"], "no_telegram_id");
}

#[tokio::test]
async fn test_auth_upsert_is_idempotent_and_preserves_role() {
    let (app, pool) = common::build_test_app().await;

    let first = common::signed_init_data(
        r#"{"id":900005,"username":"old_name"}"#,
        Utc::now().timestamp(),
    );
    let resp = app.clone().oneshot(auth_request(&first)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Promote out-of-band, the way an operator would.
    sqlx::query("UPDATE users SET role = 'creator' WHERE telegram_id = 900005")
        .execute(&pool)
        .await
        .unwrap();

    // Re-authenticate with a changed username.
    let second = common::signed_init_data(
        r#"{"id":900005,"username":"new_name"}"#,
        Utc::now().timestamp(),
    );
    let resp = app.oneshot(auth_request(&second)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["user"]["username"], "new_name");
    assert_eq!(json["user"]["role"], "creator");

    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM users WHERE telegram_id = 900005")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count.0, 1);
}

#[tokio::test]
async fn test_auth_malformed_body_keeps_error_shape() {
    let (app, _pool) = common::build_test_app().await;

    // Broken JSON must still come back as {ok:false, error:<code>}, not a
    // framework parser message.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/telegram")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(resp).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "invalid_init_data");

    // Same for a body without a JSON content-type.
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/telegram")
                .body(Body::from("init_data=whatever"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(resp).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "invalid_init_data");
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let (app, _pool) = common::build_test_app().await;

    let resp = app
        .oneshot(Request::builder().uri("/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let json = json_body(resp).await;
    assert_eq!(json["error"], "no_token");
}

#[tokio::test]
async fn test_me_with_garbage_token_is_unauthorized() {
    let (app, _pool) = common::build_test_app().await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header("authorization", "Bearer not.a.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let json = json_body(resp).await;
    assert_eq!(json["error"], "invalid_token");
}

#[tokio::test]
async fn test_me_for_unknown_user_is_not_found() {
    let (app, _pool) = common::build_test_app().await;

    // Valid token for an id that was never upserted.
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header("authorization", common::bearer(999999999))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let json = json_body(resp).await;
    assert_eq!(json["error"], "user_not_found");
}

#[tokio::test]
async fn test_role_change_applies_without_reissuing_token() {
    let (app, pool) = common::build_test_app().await;

    common::seed_user(&pool, 900006, "promotee", Role::User).await;
    let auth = common::bearer(900006);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header("authorization", auth.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(resp).await["user"]["role"], "user");

    sqlx::query("UPDATE users SET role = 'admin' WHERE telegram_id = 900006")
        .execute(&pool)
        .await
        .unwrap();

    // Same token, fresh role.
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header("authorization", auth.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(resp).await["user"]["role"], "admin");
}
