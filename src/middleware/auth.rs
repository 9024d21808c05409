//! Session middleware
//!
//! Resolves the session cookie on every request. Requests without a live
//! session pass through anonymously; handlers decide what that means via
//! [`require_role`](super::require_role).

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::config::auth::AuthConfig;
use crate::error::{AppError, Result};
use crate::models::user;
use crate::services::sessions::find_session_user;
use crate::state::AppState;

/// Signed-in user stored in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: user::Model,
    pub session_id: String,
}

/// Session attached to the current request, if any
#[derive(Debug, Clone, Default)]
pub struct CurrentSession(pub Option<AuthenticatedUser>);

impl CurrentSession {
    pub fn user(&self) -> Option<&user::Model> {
        self.0.as_ref().map(|auth| &auth.user)
    }

    pub fn session_id(&self) -> Option<&str> {
        self.0.as_ref().map(|auth| auth.session_id.as_str())
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(CurrentSession(
            parts.extensions.get::<AuthenticatedUser>().cloned(),
        ))
    }
}

/// Attach the session user, if the cookie names a live session
pub async fn load_session(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let cookie_name = &state.config.auth.session_cookie_name;

    if let Some(session_id) = session_id_from_headers(req.headers(), cookie_name) {
        match find_session_user(&state.db, &session_id).await {
            Ok(Some(user)) => {
                req.extensions_mut()
                    .insert(AuthenticatedUser { user, session_id });
            }
            Ok(None) => {
                tracing::debug!("Ignoring unknown or expired session cookie");
            }
            Err(e) => {
                tracing::warn!("Session lookup failed: {}", e);
            }
        }
    }

    next.run(req).await
}

/// Extract the session id from the `Cookie` header
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let prefix = format!("{}=", cookie_name);

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(&prefix))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// `Set-Cookie` value starting a session
pub fn session_cookie(config: &AuthConfig, session_id: &str) -> Result<HeaderValue> {
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        config.session_cookie_name,
        session_id,
        config.session_ttl_hours * 3600,
        if config.secure_cookies { "; Secure" } else { "" }
    );
    cookie_header(cookie)
}

/// `Set-Cookie` value clearing the session
pub fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue> {
    let cookie = format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0{}",
        config.session_cookie_name,
        if config.secure_cookies { "; Secure" } else { "" }
    );
    cookie_header(cookie)
}

fn cookie_header(cookie: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("Invalid session cookie header: {}", e)))
}
