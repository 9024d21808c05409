use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{application, scholarship};

/// Scholarship creation payload, shared by the JSON API and the admin pages
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ScholarshipRequest {
    #[validate(required, length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(required, length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(required, length(min = 1))]
    pub eligibility: Option<String>,
    #[validate(required, range(exclusive_min = 0.0))]
    pub amount: Option<f64>,
    #[validate(required)]
    pub start_date: Option<String>,
    #[validate(required)]
    pub end_date: Option<String>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub min_cgpa: Option<f64>,
    #[validate(range(min = 0.0))]
    pub income_limit: Option<f64>,
}

impl ScholarshipRequest {
    fn trimmed(self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        Self {
            name: trim(self.name),
            category: trim(self.category),
            eligibility: trim(self.eligibility),
            start_date: trim(self.start_date),
            end_date: trim(self.end_date),
            ..self
        }
    }
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`)
pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("invalid_date_format".to_string()))
}

/// Validate a request and insert the scholarship
pub async fn create_scholarship<C: ConnectionTrait>(
    db: &C,
    request: ScholarshipRequest,
) -> Result<scholarship::Model> {
    let request = request.trimmed();
    request.validate()?;

    let (
        Some(name),
        Some(category),
        Some(eligibility),
        Some(amount),
        Some(start_date),
        Some(end_date),
    ) = (
        request.name,
        request.category,
        request.eligibility,
        request.amount,
        request.start_date,
        request.end_date,
    )
    else {
        return Err(AppError::invalid_fields());
    };

    let start_date = parse_iso_date(&start_date)?;
    let end_date = parse_iso_date(&end_date)?;

    let record = scholarship::ActiveModel {
        name: Set(name),
        category: Set(category),
        eligibility: Set(eligibility),
        amount: Set(amount),
        start_date: Set(start_date),
        end_date: Set(end_date),
        min_cgpa: Set(request.min_cgpa),
        income_limit: Set(request.income_limit),
        ..Default::default()
    };
    let saved = record.insert(db).await?;

    tracing::info!("Scholarship {} created: {}", saved.id, saved.name);
    Ok(saved)
}

pub async fn find_scholarship<C: ConnectionTrait>(
    db: &C,
    scholarship_id: i64,
) -> Result<scholarship::Model> {
    Scholarship::find_by_id(scholarship_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("not_found".to_string()))
}

/// Delete a scholarship together with its applications
pub async fn delete_scholarship<C>(db: &C, scholarship_id: i64) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let existing = find_scholarship(&txn, scholarship_id).await?;

    let removed = Application::delete_many()
        .filter(application::Column::ScholarshipId.eq(existing.id))
        .exec(&txn)
        .await?;
    Scholarship::delete_by_id(existing.id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        "Scholarship {} deleted along with {} applications",
        scholarship_id,
        removed.rows_affected
    );
    Ok(())
}

/// Scholarships whose window contains `today`, soonest-closing first
pub async fn list_open<C: ConnectionTrait>(
    db: &C,
    today: NaiveDate,
) -> Result<Vec<scholarship::Model>> {
    Ok(Scholarship::find()
        .filter(scholarship::Column::StartDate.lte(today))
        .filter(scholarship::Column::EndDate.gte(today))
        .order_by_asc(scholarship::Column::EndDate)
        .order_by_asc(scholarship::Column::Id)
        .all(db)
        .await?)
}

/// Every scholarship, latest end date first (admin view)
pub async fn list_all_by_end_date_desc<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<scholarship::Model>> {
    Ok(Scholarship::find()
        .order_by_desc(scholarship::Column::EndDate)
        .all(db)
        .await?)
}

/// Every scholarship in insertion order (JSON API listing)
pub async fn list_all<C: ConnectionTrait>(db: &C) -> Result<Vec<scholarship::Model>> {
    Ok(Scholarship::find()
        .order_by_asc(scholarship::Column::Id)
        .all(db)
        .await?)
}
