//! Document storage for application uploads.
//!
//! Every stored document gets its own directory,
//! `<root>/user_<id>/<token>/<sanitized name>`, so two uploads never share a
//! path even when the client names match. The database keeps the path
//! relative to the root so it can be turned into a `/uploads/` URL.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::error::AppError;

/// Extensions accepted for uploaded documents
pub const ALLOWED_DOC_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid file type, allowed: pdf, jpg, jpeg, png")]
    InvalidFileType,
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UploadError> for AppError {
    fn from(error: UploadError) -> Self {
        match error {
            UploadError::InvalidFileType => AppError::BadRequest("invalid_file_type".to_string()),
            UploadError::Io(e) => AppError::Io(e),
        }
    }
}

/// A validated file waiting to be written
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PendingUpload {
    /// Sanitize the client-supplied name and check its extension
    pub fn new(original_name: &str, bytes: Vec<u8>) -> Result<Self, UploadError> {
        let file_name = sanitize_filename(original_name);
        match extension(&file_name) {
            Some(ext) if ALLOWED_DOC_EXTENSIONS.contains(&ext.as_str()) => {
                Ok(Self { file_name, bytes })
            }
            _ => Err(UploadError::InvalidFileType),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `upload` under a fresh directory of the student's folder and
    /// return the stored relative path.
    ///
    /// Existing files are never replaced.
    pub async fn save(&self, user_id: i64, upload: &PendingUpload) -> Result<String, UploadError> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let relative_dir = format!("user_{}/{}", user_id, token);
        let dir = self.root.join(&relative_dir);
        tokio::fs::create_dir_all(&dir).await?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dir.join(&upload.file_name))
            .await?;
        file.write_all(&upload.bytes).await?;
        file.flush().await?;

        let stored = format!("{}/{}", relative_dir, upload.file_name);
        tracing::debug!("Stored upload {}", stored);
        Ok(stored)
    }

    /// Remove a stored file and its per-upload directory.
    ///
    /// Missing files are not an error.
    pub async fn remove(&self, stored_path: &str) {
        let path = self.root.join(stored_path);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove upload {}: {}", path.display(), e);
                return;
            }
        }

        // Only the token directory is removed; it is empty once its file is gone
        if let Some(dir) = path.parent().filter(|dir| *dir != self.root) {
            if let Err(e) = tokio::fs::remove_dir(dir).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!("Left upload directory {}: {}", dir.display(), e);
                }
            }
        }
    }
}

/// Reduce a client filename to `[A-Za-z0-9_.-]`, with whitespace runs as `_`
pub fn sanitize_filename(name: &str) -> String {
    let name = name.replace(['/', '\\'], " ");
    let joined = name.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Lowercased extension after the last dot
pub fn extension(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Public URL for a stored document, or empty when nothing is stored
pub fn upload_url(stored_path: &str) -> String {
    if stored_path.is_empty() {
        return String::new();
    }
    let normalized = stored_path.replace('\\', "/");
    format!("/uploads/{}", normalized.trim_start_matches('/'))
}

pub fn is_pdf(stored_path: &str) -> bool {
    stored_path.to_lowercase().ends_with(".pdf")
}
