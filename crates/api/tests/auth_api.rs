//! HTTP-level integration tests for registration, login, session refresh,
//! logout, the account endpoints and password reset.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Duration, Utc};
use common::{
    body_json, get, get_auth, jpeg_bytes, multipart_auth, png_bytes, post, post_json,
    post_json_auth, seed_user, Part,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

const PASSWORD: &str = "hunter2hunter2";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn register(app: axum::Router, username: &str, creator: bool) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/register",
        json!({
            "username": username,
            "password": PASSWORD,
            "confirm_password": PASSWORD,
            "creator": creator,
        }),
    )
    .await
}

async fn login(app: axum::Router, username: &str, password: &str, remember: bool) -> Value {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": username, "password": password, "remember": remember }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

async fn session_expiries(pool: &SqlitePool, username: &str) -> Vec<DateTime<Utc>> {
    sqlx::query_scalar(
        "SELECT s.expires_at FROM sessions s JOIN users u ON u.id = s.user_id \
         WHERE u.username = $1 ORDER BY s.id",
    )
    .bind(username)
    .fetch_all(pool)
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_then_login(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = register(app.clone(), "maker", true).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "maker");
    assert_eq!(json["data"]["role"], "creator");

    let auth = login(app, "maker", PASSWORD, false).await;
    assert!(auth["access_token"].is_string());
    assert!(auth["refresh_token"].is_string());
    assert_eq!(auth["expires_in"], 900);
    assert_eq!(auth["user"]["role"], "creator");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_defaults_to_listener(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let json = body_json(register(app, "listener", false).await).await;
    assert_eq!(json["data"]["role"], "user");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_taken_username_is_validation_error(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    assert_eq!(register(app.clone(), "alice", false).await.status(), StatusCode::CREATED);

    let response = register(app.clone(), "alice", false).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("username"));

    // Usernames are case-sensitive.
    assert_eq!(register(app.clone(), "Alice", false).await.status(), StatusCode::CREATED);
    login(app, "Alice", PASSWORD, false).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_rejects_bad_input(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let mismatch = post_json(
        app.clone(),
        "/api/v1/auth/register",
        json!({ "username": "bob", "password": PASSWORD, "confirm_password": "different-pass" }),
    )
    .await;
    assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);

    let short = post_json(
        app.clone(),
        "/api/v1/auth/register",
        json!({ "username": "bob", "password": "short", "confirm_password": "short" }),
    )
    .await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
    let json = body_json(short).await;
    assert!(json["error"].as_str().unwrap().contains("at least 8"));

    let long_name = post_json(
        app,
        "/api/v1/auth/register",
        json!({
            "username": "x".repeat(21),
            "password": PASSWORD,
            "confirm_password": PASSWORD,
        }),
    )
    .await;
    assert_eq!(long_name.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login / sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_failures_are_401(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "carol", false).await;

    for (username, password) in [("carol", "wrong-password"), ("nobody", PASSWORD)] {
        let response = post_json(
            app.clone(),
            "/api/v1/auth/login",
            json!({ "username": username, "password": password }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_remember_selects_long_session(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    register(app.clone(), "dave", false).await;

    login(app.clone(), "dave", PASSWORD, false).await;
    login(app, "dave", PASSWORD, true).await;

    let expiries = session_expiries(&pool, "dave").await;
    assert_eq!(expiries.len(), 2);
    let now = Utc::now();
    assert!(expiries[0] < now + Duration::hours(25));
    assert!(expiries[1] > now + Duration::days(29));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_token(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "erin", false).await;
    let auth = login(app.clone(), "erin", PASSWORD, false).await;
    let old_refresh = auth["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": old_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await["data"].clone();
    assert_ne!(rotated["refresh_token"], auth["refresh_token"]);
    assert_eq!(rotated["user"]["username"], "erin");

    // The old token was revoked by the rotation.
    let replay = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": old_refresh }),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_sessions(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "frank", false).await;
    let auth = login(app.clone(), "frank", PASSWORD, false).await;
    let access = auth["access_token"].as_str().unwrap();

    assert_eq!(
        post(app.clone(), "/api/v1/auth/logout", None).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        post(app.clone(), "/api/v1/auth/logout", Some(access)).await.status(),
        StatusCode::NO_CONTENT
    );

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": auth["refresh_token"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_garbage_bearer_token_is_401(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app.clone(), "/api/v1/account", "not-a-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(app, "/api/v1/account").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_account_hides_password_hash(pool: SqlitePool) {
    let (_, token) = seed_user(&pool, "grace", "user").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/account", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "grace");
    assert_eq!(json["data"]["image_file"], "default.jpg");
    assert!(json["data"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_account_with_picture(pool: SqlitePool) {
    let (_, token) = seed_user(&pool, "heidi", "user").await;
    let (app, store) = common::build_test_app_with_store(pool);
    let picture = png_bytes(600, 400);

    let response = multipart_auth(
        app.clone(),
        Method::PUT,
        "/api/v1/account",
        &[
            Part::Text("username", "heidi_k"),
            Part::Text("bank_details", "DE89 3704 0044 0532 0130 00"),
            Part::File {
                name: "picture",
                filename: "me.png",
                content_type: "image/png",
                bytes: &picture,
            },
        ],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "heidi_k");
    assert_eq!(json["data"]["bank_details"], "DE89 3704 0044 0532 0130 00");

    let key = json["data"]["image_file"].as_str().unwrap().to_string();
    assert!(key.starts_with("profile_pics/") && key.ends_with(".png"));
    assert_eq!(store.keys().await, vec![key.clone()]);

    let served = get(app, &format!("/media/{key}")).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.headers()["content-type"], "image/png");
    let stored = common::body_bytes(served).await;
    let decoded = image::load_from_memory(&stored).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (300, 200));
}

async fn put_picture(app: axum::Router, token: &str, filename: &str, bytes: &[u8]) -> Value {
    let response = multipart_auth(
        app,
        Method::PUT,
        "/api/v1/account",
        &[
            Part::Text("username", "heidi"),
            Part::File {
                name: "picture",
                filename,
                content_type: "image/png",
                bytes,
            },
        ],
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_picture_key_follows_image_content(pool: SqlitePool) {
    let (_, token) = seed_user(&pool, "heidi", "user").await;
    let (app, store) = common::build_test_app_with_store(pool);

    let json = put_picture(app.clone(), &token, "me.png", &jpeg_bytes(400, 400)).await;
    let key = json["data"]["image_file"].as_str().unwrap().to_string();
    assert!(key.starts_with("profile_pics/") && key.ends_with(".jpg"), "{key}");
    assert_eq!(store.keys().await, vec![key.clone()]);

    let served = get(app, &format!("/media/{key}")).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.headers()["content-type"], "image/jpeg");
    let stored = common::body_bytes(served).await;
    assert_eq!(image::guess_format(&stored).unwrap(), image::ImageFormat::Jpeg);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_new_picture_replaces_previous_blob(pool: SqlitePool) {
    let (_, token) = seed_user(&pool, "heidi", "user").await;
    let (app, store) = common::build_test_app_with_store(pool);

    let mut latest = String::new();
    for size in [120, 140, 160] {
        let json = put_picture(app.clone(), &token, "me.png", &png_bytes(size, size)).await;
        latest = json["data"]["image_file"].as_str().unwrap().to_string();
    }
    assert_eq!(store.keys().await, vec![latest.clone()]);

    // Updating other fields keeps the current picture.
    let response = multipart_auth(
        app,
        Method::PUT,
        "/api/v1/account",
        &[Part::Text("username", "heidi_2")],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["image_file"], latest.as_str());
    assert_eq!(store.keys().await, vec![latest]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_rejected_picture_update_stores_nothing(pool: SqlitePool) {
    seed_user(&pool, "ivan", "user").await;
    let (_, token) = seed_user(&pool, "judy", "user").await;
    let (app, store) = common::build_test_app_with_store(pool);

    let response = multipart_auth(
        app,
        Method::PUT,
        "/api/v1/account",
        &[
            Part::Text("username", "ivan"),
            Part::File {
                name: "picture",
                filename: "me.png",
                content_type: "image/png",
                bytes: &png_bytes(50, 50),
            },
        ],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.keys().await.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_account_rejects_taken_username(pool: SqlitePool) {
    seed_user(&pool, "ivan", "user").await;
    let (_, token) = seed_user(&pool, "judy", "user").await;
    let app = common::build_test_app(pool);

    let taken = multipart_auth(
        app.clone(),
        Method::PUT,
        "/api/v1/account",
        &[Part::Text("username", "ivan")],
        &token,
    )
    .await;
    assert_eq!(taken.status(), StatusCode::BAD_REQUEST);

    // Keeping one's own name is fine.
    let same = multipart_auth(
        app.clone(),
        Method::PUT,
        "/api/v1/account",
        &[Part::Text("username", "judy")],
        &token,
    )
    .await;
    assert_eq!(same.status(), StatusCode::OK);

    let bad_picture = multipart_auth(
        app,
        Method::PUT,
        "/api/v1/account",
        &[
            Part::Text("username", "judy"),
            Part::File {
                name: "picture",
                filename: "me.gif",
                content_type: "image/gif",
                bytes: b"GIF89a",
            },
        ],
        &token,
    )
    .await;
    assert_eq!(bad_picture.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_password_reset_flow(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "mallory", false).await;
    let auth = login(app.clone(), "mallory", PASSWORD, false).await;
    let access = auth["access_token"].as_str().unwrap();

    let response = post(app.clone(), "/api/v1/account/reset-token", Some(access)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let reset_token = json["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(json["data"]["expires_in"], 1800);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/password-reset",
        json!({
            "token": reset_token,
            "password": "brand-new-password",
            "confirm_password": "brand-new-password",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Old sessions are gone, the old password no longer works.
    let refresh = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": auth["refresh_token"] }),
    )
    .await;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);

    let old = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "username": "mallory", "password": PASSWORD }),
    )
    .await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    login(app, "mallory", "brand-new-password", false).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_password_reset_rejects_bad_tokens(pool: SqlitePool) {
    let (_, access_token) = seed_user(&pool, "oscar", "user").await;
    let app = common::build_test_app(pool);

    // Neither garbage nor an access token works as a reset token.
    for token in ["garbage", access_token.as_str()] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/auth/password-reset",
            json!({
                "token": token,
                "password": "brand-new-password",
                "confirm_password": "brand-new-password",
            }),
            &access_token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"]
            .as_str()
            .unwrap()
            .contains("invalid or expired"));
    }
}
