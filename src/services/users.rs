use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::user::{self, normalize_email};
use crate::models::Role;
use crate::services::security::CredentialStore;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    pub department: Option<String>,
    pub role: Option<String>,
}

/// Profile fields a student may edit.
///
/// `cgpa` and `family_income` keep their stored values when absent;
/// `department` is replaced as given.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(max = 120))]
    pub name: Option<String>,
    pub department: Option<String>,
    pub cgpa: Option<f64>,
    #[validate(range(min = 0.0))]
    pub family_income: Option<f64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn email_taken(error: &sea_orm::DbErr) -> bool {
    matches!(error.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<user::Model>> {
    Ok(User::find()
        .filter(user::Column::Email.eq(normalize_email(email)))
        .one(db)
        .await?)
}

/// Create an account. Admin accounts need `allow_admin` set.
pub async fn register<C: ConnectionTrait>(
    db: &C,
    credentials: &CredentialStore,
    request: RegisterRequest,
    allow_admin: bool,
) -> Result<user::Model> {
    let request = RegisterRequest {
        name: request.name.trim().to_string(),
        email: normalize_email(&request.email),
        ..request
    };
    request.validate()?;

    let role = match request.role.as_deref().map(str::trim) {
        None | Some("") => Role::Student,
        Some(value) => Role::parse(value).ok_or_else(AppError::invalid_fields)?,
    };
    if role == Role::Admin && !allow_admin {
        tracing::warn!("Rejected admin self-registration for {}", request.email);
        return Err(AppError::Forbidden("forbidden".to_string()));
    }

    if find_by_email(db, &request.email).await?.is_some() {
        return Err(AppError::Conflict("email_taken".to_string()));
    }

    let record = user::ActiveModel {
        name: Set(request.name),
        email: Set(request.email),
        password_hash: Set(credentials.hash(&request.password)?),
        role: Set(role),
        department: Set(non_blank(request.department)),
        cgpa: Set(None),
        family_income: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = match record.insert(db).await {
        Ok(model) => model,
        Err(e) if email_taken(&e) => return Err(AppError::Conflict("email_taken".to_string())),
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Registered {} user {} ({})", created.role, created.id, created.email);
    Ok(created)
}

/// Check an email/password pair.
///
/// Unknown emails and wrong passwords both fail with `invalid_credentials`.
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    credentials: &CredentialStore,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    let found = find_by_email(db, email).await?;

    match found {
        Some(user) if credentials.verify(password, &user.password_hash) => Ok(user),
        _ => {
            tracing::info!("Failed login attempt for {}", normalize_email(email));
            Err(AppError::Unauthorized("invalid_credentials".to_string()))
        }
    }
}

pub async fn update_profile<C: ConnectionTrait>(
    db: &C,
    current: user::Model,
    update: ProfileUpdate,
) -> Result<user::Model> {
    update.validate()?;

    let name = non_blank(update.name).unwrap_or_else(|| current.name.clone());
    let cgpa = update.cgpa.or(current.cgpa);
    let family_income = update.family_income.or(current.family_income);

    let mut record: user::ActiveModel = current.into();
    record.name = Set(name);
    record.department = Set(non_blank(update.department));
    record.cgpa = Set(cgpa);
    record.family_income = Set(family_income);

    let saved = record.update(db).await?;
    tracing::info!("Profile updated for user {}", saved.id);
    Ok(saved)
}

/// All student accounts, alphabetically
pub async fn list_students<C: ConnectionTrait>(db: &C) -> Result<Vec<user::Model>> {
    Ok(User::find()
        .filter(user::Column::Role.eq(Role::Student))
        .order_by_asc(user::Column::Name)
        .all(db)
        .await?)
}
