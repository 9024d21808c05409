use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::middleware::auth::{clear_session_cookie, session_cookie};
use crate::middleware::CurrentSession;
use crate::models::Role;
use crate::services::sessions::{create_session, purge_expired_sessions, revoke_session};
use crate::services::users::{self, RegisterRequest};
use crate::state::AppState;

/// Create auth routes for session management
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: i64,
    pub role: Role,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub ok: bool,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub ok: bool,
    pub user_id: i64,
}

// ============================================================================
// Session Management Endpoints
// ============================================================================

/// Check credentials and start a session cookie.
///
/// Also mounted as `POST /api/login`.
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;

    let user = users::authenticate(
        &state.db,
        &state.credentials,
        &request.email,
        &request.password,
    )
    .await?;

    purge_expired_sessions(&state.db).await?;
    let session = create_session(&state.db, user.id, state.config.auth.session_ttl_hours).await?;

    tracing::info!("User {} ({}) logged in", user.id, user.role);

    let body = Json(LoginResponse {
        ok: true,
        user: SessionUser {
            id: user.id,
            role: user.role,
            name: user.name,
        },
    });

    Ok((
        [(
            header::SET_COOKIE,
            session_cookie(&state.config.auth, &session.id)?,
        )],
        body,
    )
        .into_response())
}

async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;

    let user = users::register(
        &state.db,
        &state.credentials,
        request,
        state.config.auth.allow_admin_registration,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            ok: true,
            user_id: user.id,
        }),
    )
        .into_response())
}

/// Revoke the current session, if any, and clear the cookie
async fn logout(State(state): State<AppState>, session: CurrentSession) -> Result<Response> {
    if let Some(session_id) = session.session_id() {
        revoke_session(&state.db, session_id).await?;
        if let Some(user) = session.user() {
            tracing::info!("User {} logged out", user.id);
        }
    }

    Ok((
        [(header::SET_COOKIE, clear_session_cookie(&state.config.auth)?)],
        Json(serde_json::json!({ "ok": true })),
    )
        .into_response())
}
