use std::env;

use super::env_flag;
use crate::services::security::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_cookie_name: String,
    pub session_ttl_hours: i64,
    /// Add the `Secure` attribute to the session cookie
    pub secure_cookies: bool,
    /// Let `/auth/register` create admin accounts
    pub allow_admin_registration: bool,
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            session_cookie_name: match env::var("SCHOLARHUB_SESSION_COOKIE") {
                Ok(name) if is_valid_cookie_name(&name) => name,
                Ok(name) => {
                    tracing::warn!(
                        "Invalid SCHOLARHUB_SESSION_COOKIE {:?}, using {}",
                        name,
                        defaults.session_cookie_name
                    );
                    defaults.session_cookie_name
                }
                Err(_) => defaults.session_cookie_name,
            },
            session_ttl_hours: env::var("SCHOLARHUB_SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|hours: &i64| *hours > 0)
                .unwrap_or(defaults.session_ttl_hours),
            secure_cookies: env_flag("SCHOLARHUB_SECURE_COOKIES"),
            allow_admin_registration: env_flag("SCHOLARHUB_ALLOW_ADMIN_SIGNUP"),
            bcrypt_cost: env::var("SCHOLARHUB_BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|cost| (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(cost))
                .unwrap_or(defaults.bcrypt_cost),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "scholarhub_session".to_string(),
            session_ttl_hours: 168,
            secure_cookies: false,
            allow_admin_registration: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Cookie names must be a non-empty RFC 6265 token
pub fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}
