use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};

use crate::error::Result;
use crate::models::prelude::*;
use crate::models::{session, user};

/// Start a new session for `user_id`, valid for `ttl_hours`
pub async fn create_session<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    ttl_hours: i64,
) -> Result<session::Model> {
    let now = Utc::now();
    let record = session::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        created_at: Set(now),
        expires_at: Set(now + Duration::hours(ttl_hours)),
        is_revoked: Set(false),
    };

    Ok(record.insert(db).await?)
}

/// Resolve a session id to its user, ignoring revoked and expired sessions
pub async fn find_session_user<C: ConnectionTrait>(
    db: &C,
    session_id: &str,
) -> Result<Option<user::Model>> {
    let found = Session::find_by_id(session_id.to_string())
        .filter(session::Column::IsRevoked.eq(false))
        .filter(session::Column::ExpiresAt.gt(Utc::now()))
        .find_also_related(User)
        .one(db)
        .await?;

    Ok(found.and_then(|(_, user)| user))
}

/// Mark a session revoked. Unknown ids are ignored.
pub async fn revoke_session<C: ConnectionTrait>(db: &C, session_id: &str) -> Result<()> {
    Session::update_many()
        .col_expr(session::Column::IsRevoked, sea_orm::sea_query::Expr::value(true))
        .filter(session::Column::Id.eq(session_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Delete expired and revoked sessions, returning how many were removed
pub async fn purge_expired_sessions<C: ConnectionTrait>(db: &C) -> Result<u64> {
    let result = Session::delete_many()
        .filter(
            session::Column::ExpiresAt
                .lte(Utc::now())
                .or(session::Column::IsRevoked.eq(true)),
        )
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        tracing::debug!("Purged {} stale sessions", result.rows_affected);
    }
    Ok(result.rows_affected)
}
