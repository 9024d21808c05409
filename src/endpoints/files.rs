use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::error::Result;
use crate::middleware::{require_login, CurrentSession};
use crate::state::AppState;

/// Stored documents, mounted under `/uploads`
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/{*path}", get(serve_upload))
}

/// Serve a stored document to any signed-in user
async fn serve_upload(
    State(state): State<AppState>,
    session: CurrentSession,
    req: Request,
) -> Result<Response> {
    require_login(&session)?;

    let response = match ServeDir::new(state.uploads.root()).oneshot(req).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    Ok(response.into_response())
}
