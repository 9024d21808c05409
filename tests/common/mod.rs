//! Shared helpers for integration tests.
//!
//! Builds the full router over an in-memory database and a temporary
//! upload root, and wraps the request/response plumbing.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;
use tower::ServiceExt;

use scholarhub::config::Config;
use scholarhub::endpoints::create_router;
use scholarhub::migrations::Migrator;
use scholarhub::models::{scholarship, user, Role};
use scholarhub::services::security::MIN_BCRYPT_COST;
use scholarhub::services::{today, CredentialStore};
use scholarhub::state::AppState;

pub const PASSWORD: &str = "password123";

/// Router plus the state behind it
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: TempDir,
}

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

pub async fn test_app() -> TestApp {
    test_app_with(|_| {}).await
}

/// Build the app after letting the caller adjust the config
pub async fn test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");

    let mut config = Config::default();
    config.auth.bcrypt_cost = MIN_BCRYPT_COST;
    config.uploads.upload_dir = upload_dir.path().to_path_buf();
    customize(&mut config);

    let state = AppState::new(create_test_db().await, config);
    let router = create_router(state.clone());

    TestApp {
        router,
        state,
        upload_dir,
    }
}

pub async fn create_user(app: &TestApp, name: &str, email: &str, role: Role) -> user::Model {
    let credentials = CredentialStore::new(MIN_BCRYPT_COST);

    user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(credentials.hash(PASSWORD).unwrap()),
        role: Set(role),
        department: Set(None),
        cgpa: Set(None),
        family_income: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&app.state.db)
    .await
    .unwrap()
}

/// Student with a recorded department and family income
pub async fn create_student_with_profile(
    app: &TestApp,
    name: &str,
    email: &str,
    department: &str,
    family_income: Option<f64>,
) -> user::Model {
    let student = create_user(app, name, email, Role::Student).await;
    let mut record: user::ActiveModel = student.into();
    record.department = Set(Some(department.to_string()));
    record.family_income = Set(family_income);
    record.update(&app.state.db).await.unwrap()
}

pub async fn create_scholarship(
    app: &TestApp,
    name: &str,
    amount: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    min_cgpa: Option<f64>,
    income_limit: Option<f64>,
) -> scholarship::Model {
    scholarship::ActiveModel {
        name: Set(name.to_string()),
        category: Set("merit".to_string()),
        eligibility: Set("See thresholds".to_string()),
        amount: Set(amount),
        start_date: Set(start_date),
        end_date: Set(end_date),
        min_cgpa: Set(min_cgpa),
        income_limit: Set(income_limit),
        ..Default::default()
    }
    .insert(&app.state.db)
    .await
    .unwrap()
}

/// Scholarship open from a week ago until a month from now
pub async fn create_open_scholarship(
    app: &TestApp,
    name: &str,
    amount: f64,
    min_cgpa: Option<f64>,
    income_limit: Option<f64>,
) -> scholarship::Model {
    let today = today();
    create_scholarship(
        app,
        name,
        amount,
        today - Duration::days(7),
        today + Duration::days(30),
        min_cgpa,
        income_limit,
    )
    .await
}

/// Send a request and decode the JSON body (`Null` when not JSON)
pub async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

/// Send a request and return the raw body
pub async fn send_raw(app: &TestApp, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json_request(uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get_json(app: &TestApp, uri: &str, cookie: Option<&str>) -> (StatusCode, serde_json::Value) {
    send(app, get_request(uri, cookie)).await
}

pub async fn post_json(
    app: &TestApp,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, post_json_request(uri, cookie, body)).await
}

/// Log in and return the `name=value` pair to send back as `Cookie`
pub async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let response = app
        .router
        .clone()
        .oneshot(post_json_request(
            "/auth/login",
            None,
            serde_json::json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "login failed for {}", email);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set a session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// One part of a multipart form
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub const BOUNDARY: &str = "scholarhub-test-boundary";

pub fn multipart_request(uri: &str, cookie: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}
