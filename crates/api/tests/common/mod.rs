#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use soundshelf_api::auth::jwt::{generate_access_token, JwtConfig};
use soundshelf_api::config::ServerConfig;
use soundshelf_api::router::build_app_router;
use soundshelf_api::state::AppState;
use soundshelf_core::storage::MemoryBlobStore;
use soundshelf_db::models::track::{CreateTrack, Track};
use soundshelf_db::models::user::{CreateUser, User};
use soundshelf_db::repositories::{GenreRepo, TrackRepo, UserRepo};

pub const TEST_SECRET: &str = "integration-test-secret-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        media_root: "unused".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 10 * 1024 * 1024,
        min_password_length: 8,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry_mins: 15,
            session_expiry_hours: 24,
            remember_expiry_days: 30,
            reset_token_expiry_mins: 30,
        },
    }
}

/// Build the full application router (same middleware stack as the server)
/// on an in-memory blob store.
pub fn build_test_app(pool: SqlitePool) -> Router {
    build_test_app_with_store(pool).0
}

/// Like [`build_test_app`], also returning the blob store for inspection.
pub fn build_test_app_with_store(pool: SqlitePool) -> (Router, Arc<MemoryBlobStore>) {
    let config = test_config();
    let store = Arc::new(MemoryBlobStore::new());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        blob_store: store.clone(),
    };

    (build_app_router(state, &config), store)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    json: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST with no body, optionally authenticated.
pub async fn post(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn multipart_auth(
    app: Router,
    method: Method,
    uri: &str,
    parts: &[Part<'_>],
    token: &str,
) -> Response<Body> {
    let (content_type, body) = multipart_body(parts);
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "soundshelf-test-boundary";

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// Encode `parts` as `multipart/form-data`. Returns the content type header
/// value and the body.
pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// A solid PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 90]));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("png encoding should succeed");
    out.into_inner()
}

/// A solid JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([30, 90, 160]));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .expect("jpeg encoding should succeed");
    out.into_inner()
}

/// Bytes standing in for an mp3; stored and served as-is.
pub const FAKE_MP3: &[u8] = b"ID3\x03\x00\x00\x00\x00\x00\x00not-really-audio";

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("response body should be JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly (no password hashing) and mint an access token.
pub async fn seed_user(pool: &SqlitePool, username: &str, role: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: "unused".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed");

    let token = generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

pub async fn genre_id(pool: &SqlitePool, name: &str) -> i64 {
    GenreRepo::find_by_name(pool, name)
        .await
        .unwrap()
        .expect("genre should be seeded")
        .id
}

pub async fn seed_track(
    pool: &SqlitePool,
    creator_id: i64,
    title: &str,
    genre: Option<&str>,
    upload_date: NaiveDate,
) -> Track {
    let genre_id = match genre {
        Some(name) => Some(genre_id(pool, name).await),
        None => None,
    };
    TrackRepo::create(
        pool,
        &CreateTrack {
            title: title.to_string(),
            creator_id,
            cover_image_file: None,
            upload_date,
            genre_id,
            shareable: true,
            premium: false,
        },
    )
    .await
    .expect("track creation should succeed")
}

pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
