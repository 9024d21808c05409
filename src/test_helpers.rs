//! Test helpers for unit tests.
//!
//! In-memory databases, a fast-hashing config and small fixture builders.

use std::path::Path;

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;
use crate::migrations::Migrator;
use crate::models::{scholarship, user, Role};
use crate::services::security::{CredentialStore, MIN_BCRYPT_COST};
use crate::services::today;

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    // One connection, otherwise each pooled connection sees its own empty database
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Config with the cheapest bcrypt cost and uploads under `upload_dir`
pub fn test_config(upload_dir: &Path) -> Config {
    let mut config = Config::default();
    config.auth.bcrypt_cost = MIN_BCRYPT_COST;
    config.uploads.upload_dir = upload_dir.to_path_buf();
    config
}

pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> user::Model {
    let credentials = CredentialStore::new(MIN_BCRYPT_COST);

    user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(credentials.hash(password).unwrap()),
        role: Set(role),
        department: Set(None),
        cgpa: Set(None),
        family_income: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Scholarship with the given window and no thresholds
pub async fn create_test_scholarship(
    db: &DatabaseConnection,
    name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> scholarship::Model {
    scholarship::ActiveModel {
        name: Set(name.to_string()),
        category: Set("merit".to_string()),
        eligibility: Set("Open to all".to_string()),
        amount: Set(10000.0),
        start_date: Set(start_date),
        end_date: Set(end_date),
        min_cgpa: Set(None),
        income_limit: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Scholarship open from a week ago until a month from now
pub async fn create_open_scholarship(
    db: &DatabaseConnection,
    name: &str,
    amount: f64,
    min_cgpa: Option<f64>,
    income_limit: Option<f64>,
) -> scholarship::Model {
    let today = today();

    scholarship::ActiveModel {
        name: Set(name.to_string()),
        category: Set("merit".to_string()),
        eligibility: Set("See thresholds".to_string()),
        amount: Set(amount),
        start_date: Set(today - Duration::days(7)),
        end_date: Set(today + Duration::days(30)),
        min_cgpa: Set(min_cgpa),
        income_limit: Set(income_limit),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
