//! Role gate called at the top of every protected handler.
//!
//! ```ignore
//! async fn admin_dashboard(
//!     State(state): State<AppState>,
//!     session: CurrentSession,
//! ) -> Result<Json<DashboardSummary>> {
//!     let admin = require_role(&session, &[Role::Admin])?;
//!     // ...
//! }
//! ```

use thiserror::Error;

use crate::error::AppError;
use crate::middleware::CurrentSession;
use crate::models::{user, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("no active session")]
    Unauthenticated,
    #[error("role not permitted")]
    Forbidden,
}

impl From<AccessDenied> for AppError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Unauthenticated => AppError::Unauthorized("unauthenticated".to_string()),
            AccessDenied::Forbidden => AppError::Forbidden("forbidden".to_string()),
        }
    }
}

/// Return the session user if their role is one of `allowed`
pub fn require_role<'a>(
    session: &'a CurrentSession,
    allowed: &[Role],
) -> Result<&'a user::Model, AccessDenied> {
    let user = session.user().ok_or(AccessDenied::Unauthenticated)?;

    if !allowed.contains(&user.role) {
        tracing::debug!(user_id = user.id, role = %user.role, "Role not permitted");
        return Err(AccessDenied::Forbidden);
    }

    Ok(user)
}

/// Any signed-in user
pub fn require_login(session: &CurrentSession) -> Result<&user::Model, AccessDenied> {
    require_role(session, &[Role::Student, Role::Admin])
}
