use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Request-boundary error.
///
/// The string carried by the client-facing variants is the stable error code
/// returned in the `error` field of the JSON body (e.g. `"duplicate"`).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Invalid JSON body: {0}")]
    Json(#[from] JsonRejection),

    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),

    #[error("Invalid path parameter: {0}")]
    Path(#[from] PathRejection),
}

impl AppError {
    /// Shorthand for the generic validation failure code
    pub fn invalid_fields() -> Self {
        AppError::BadRequest("missing_or_invalid_fields".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AppError::BadRequest(_)
            | AppError::Validation(_)
            | AppError::Multipart(_)
            | AppError::Json(_)
            | AppError::Query(_)
            | AppError::Path(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            // Conflicts (duplicate application, taken email) are reported as plain 400s
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_)
            | AppError::Database(_)
            | AppError::Io(_)
            | AppError::Bcrypt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    ok: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = match self {
            AppError::NotFound(code)
            | AppError::BadRequest(code)
            | AppError::Unauthorized(code)
            | AppError::Forbidden(code)
            | AppError::Conflict(code) => code,
            AppError::Validation(e) => {
                tracing::debug!("Validation failed: {}", e);
                "missing_or_invalid_fields".to_string()
            }
            AppError::Multipart(e) if status == StatusCode::PAYLOAD_TOO_LARGE => {
                tracing::info!("Upload rejected by body limit: {}", e);
                "payload_too_large".to_string()
            }
            AppError::Multipart(e) => {
                tracing::debug!("Malformed multipart body: {}", e);
                "invalid_upload".to_string()
            }
            AppError::Json(e) => {
                tracing::debug!("Rejected JSON body: {}", e);
                "missing_or_invalid_fields".to_string()
            }
            AppError::Query(e) => {
                tracing::debug!("Rejected query string: {}", e);
                "missing_or_invalid_fields".to_string()
            }
            AppError::Path(e) => {
                tracing::debug!("Rejected path parameter: {}", e);
                "missing_or_invalid_fields".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "internal_error".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "internal_error".to_string()
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                "internal_error".to_string()
            }
            AppError::Bcrypt(e) => {
                tracing::error!("Bcrypt error: {}", e);
                "internal_error".to_string()
            }
        };

        (status, Json(ErrorResponse { ok: false, error: code })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn get_response_body(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_error() {
        let (status, body) =
            get_response_body(AppError::NotFound("not_found".to_string()).into_response()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_conflict_is_bad_request() {
        let (status, body) =
            get_response_body(AppError::Conflict("duplicate".to_string()).into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "duplicate");
    }

    #[tokio::test]
    async fn test_unauthorized_and_forbidden() {
        let (status, body) = get_response_body(
            AppError::Unauthorized("invalid_credentials".to_string()).into_response(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid_credentials");

        let (status, body) =
            get_response_body(AppError::Forbidden("forbidden".to_string()).into_response()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden");
    }

    #[tokio::test]
    async fn test_internal_details_are_not_leaked() {
        let error = AppError::Internal("connection string with password".to_string());
        let (status, body) = get_response_body(error.into_response()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal_error");
    }

    #[tokio::test]
    async fn test_database_error_maps_to_500() {
        let error: AppError = sea_orm::DbErr::Custom("boom".to_string()).into();
        let (status, body) = get_response_body(error.into_response()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal_error");
    }

    #[test]
    fn test_error_display_impl() {
        assert_eq!(
            AppError::NotFound("test".to_string()).to_string(),
            "Not found: test"
        );
        assert_eq!(
            AppError::Conflict("test".to_string()).to_string(),
            "Conflict: test"
        );
        assert_eq!(
            AppError::invalid_fields().to_string(),
            "Bad request: missing_or_invalid_fields"
        );
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_error: AppError = io_err.into();
        assert!(matches!(app_error, AppError::Io(_)));
    }
}
