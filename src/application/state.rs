use std::sync::Arc;

use crate::config::Config;
use crate::db::DbConn;
use crate::services::security::CredentialStore;
use crate::services::uploads::UploadStore;

/// Application state containing all shared resources
///
/// Everything here is built once at startup and cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub config: Arc<Config>,
    pub credentials: CredentialStore,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(db: DbConn, config: Config) -> Self {
        let credentials = CredentialStore::new(config.auth.bcrypt_cost);
        let uploads = UploadStore::new(config.uploads.upload_dir.clone());

        Self {
            db,
            config: Arc::new(config),
            credentials,
            uploads,
        }
    }
}
