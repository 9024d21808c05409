pub mod admin;
pub mod api;
pub mod auth;
pub mod files;
pub mod student;

use axum::{
    extract::{DefaultBodyLimit, State},
    middleware as axum_middleware,
    response::Redirect,
    routing::get,
    Json, Router,
};

use crate::middleware::{load_session, security_headers, CurrentSession};
use crate::models::Role;
use crate::state::AppState;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health_check))
        .route("/api/system/version", get(get_version))
        .nest("/auth", auth::auth_routes())
        .nest("/api", api::api_routes())
        .nest("/student", student::student_routes())
        .nest("/admin", admin::admin_routes())
        .nest("/uploads", files::upload_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn(security_headers))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            load_session,
        ))
        .with_state(state)
}

/// Send signed-in users to their dashboard, everyone else to login
async fn index(session: CurrentSession) -> Redirect {
    match session.user().map(|user| user.role) {
        Some(Role::Admin) => Redirect::to("/admin/dashboard"),
        Some(Role::Student) => Redirect::to("/student/dashboard"),
        None => Redirect::to("/auth/login"),
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Version info endpoint
async fn get_version(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "version": state.config.version,
        "rust_version": "1.83",
        "backend": "rust"
    }))
}
