//! Shared harness for Web API integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use tempfile::TempDir;

use snippetd::web::handlers::AppState;
use snippetd::web::{create_health_router, create_router};
use snippetd::{Database, FileStorage, TokenService};

/// Signing secret used by every test server.
pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// The one email mapped to the admin role in the test role table.
pub const ADMIN_EMAIL: &str = "damien.z.hall@gmail.com";

pub struct TestApp {
    pub server: TestServer,
    /// Storage directory handle. Holding it keeps the files on disk for
    /// the lifetime of the test.
    pub storage_dir: TempDir,
}

/// Start an in-process server over an in-memory database and a temp
/// storage directory.
pub async fn spawn_app() -> TestApp {
    let db = Database::open_in_memory().await.unwrap();
    let storage_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(storage_dir.path()).unwrap();

    let mut roles = HashMap::new();
    roles.insert(ADMIN_EMAIL.to_string(), "admin".to_string());
    let tokens = Arc::new(TokenService::new(TEST_SECRET, roles).unwrap());

    let state = AppState::new(db, tokens, storage);
    let router = create_router(state, &[], 10 * 1024 * 1024).merge(create_health_router());

    TestApp {
        server: TestServer::new(router).unwrap(),
        storage_dir,
    }
}

pub async fn register(app: &TestApp, email: &str, password: &str) -> TestResponse {
    app.server
        .post("/api/auth/register")
        .json(&serde_json::json!({ "email": email, "password": password }))
        .await
}

pub async fn login(app: &TestApp, email: &str, password: &str) -> TestResponse {
    app.server
        .post("/api/auth/login")
        .json(&serde_json::json!({ "email": email, "password": password }))
        .await
}

/// Extract the `token=...` pair from the Set-Cookie header, ready to be
/// sent back in a Cookie header.
pub fn session_cookie(response: &TestResponse) -> String {
    let header = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing Set-Cookie header")
        .to_str()
        .unwrap();
    assert!(header.starts_with("token="), "unexpected cookie: {header}");
    header.split(';').next().unwrap().to_string()
}

/// Register a fresh user and hand back its session cookie.
pub async fn register_user(app: &TestApp, email: &str) -> String {
    let response = register(app, email, "password123").await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    session_cookie(&response)
}

pub fn cookie_header(cookie: &str) -> HeaderValue {
    HeaderValue::from_str(cookie).unwrap()
}

/// Build a multipart upload form.
pub fn upload_form(name: &str, content: &[u8], tags: Option<&[&str]>) -> MultipartForm {
    let mut form = MultipartForm::new()
        .add_text("name", name)
        .add_text("description", format!("{name} description"))
        .add_part(
            "file",
            Part::bytes(content.to_vec()).file_name("upload.bin"),
        );
    if let Some(tags) = tags {
        form = form.add_text("tags", serde_json::to_string(tags).unwrap());
    }
    form
}

/// Upload a file as the given session and return its metadata ID.
pub async fn upload(app: &TestApp, cookie: &str, name: &str, content: &[u8]) -> i64 {
    let response = app
        .server
        .post("/api/files")
        .add_header(header::COOKIE, cookie_header(cookie))
        .multipart(upload_form(name, content, None))
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());

    let body: serde_json::Value = response.json();
    body["data"]["id"].as_i64().unwrap()
}
