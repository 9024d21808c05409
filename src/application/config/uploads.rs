use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Root directory for stored documents; stored paths are relative to it
    pub upload_dir: PathBuf,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self {
            upload_dir: env::var("SCHOLARHUB_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| Self::default().upload_dir),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("instance/uploads"),
        }
    }
}
