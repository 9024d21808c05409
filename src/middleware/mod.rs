pub mod auth;
pub mod roles;
pub mod security_headers;

pub use auth::{load_session, AuthenticatedUser, CurrentSession};
pub use roles::{require_login, require_role, AccessDenied};
pub use security_headers::security_headers;
