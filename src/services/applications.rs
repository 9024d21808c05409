//! Application submission, review decisions and read models.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{application, scholarship, user, ApplicationStatus};
use crate::services::eligibility::{can_apply, validate_decision, DecisionError, Denial};
use crate::services::finance;
use crate::services::scholarships::find_scholarship;
use crate::services::uploads::{is_pdf, upload_url, PendingUpload, UploadStore};

/// Everything a student submits with an application.
///
/// Uploads are already sanitized and extension-checked, so nothing here
/// can fail validation once it reaches [`submit_application`].
#[derive(Debug, Default)]
pub struct NewApplication {
    pub cgpa: Option<f64>,
    pub income_proof: Option<PendingUpload>,
    pub govt_id: Option<PendingUpload>,
}

/// Submitted CGPA must be a finite value in [0, 10]
pub fn check_submitted_cgpa(cgpa: Option<f64>) -> Result<Option<f64>> {
    match cgpa {
        Some(value) if !(0.0..=10.0).contains(&value) => Err(AppError::invalid_fields()),
        other => Ok(other),
    }
}

pub async fn has_applied<C: ConnectionTrait>(
    db: &C,
    student_id: i64,
    scholarship_id: i64,
) -> Result<bool> {
    let count = Application::find()
        .filter(application::Column::StudentId.eq(student_id))
        .filter(application::Column::ScholarshipId.eq(scholarship_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Run the eligibility rules, store documents and insert a pending application.
///
/// Documents are written only after every check passes. Each one gets its
/// own stored path, so a failed insert removes exactly the files this call
/// wrote and nothing another submission still references.
pub async fn submit_application<C: ConnectionTrait>(
    db: &C,
    uploads: &UploadStore,
    student: &user::Model,
    scholarship_id: i64,
    submission: NewApplication,
    today: NaiveDate,
) -> Result<application::Model> {
    let cgpa = check_submitted_cgpa(submission.cgpa)?;
    let scholarship = find_scholarship(db, scholarship_id).await?;
    let already_applied = has_applied(db, student.id, scholarship.id).await?;

    if let Err(denial) = can_apply(student, &scholarship, cgpa, already_applied, today) {
        tracing::info!(
            student_id = student.id,
            scholarship_id = scholarship.id,
            reason = denial.code(),
            "Application refused"
        );
        return Err(denial.into());
    }

    let documents = store_documents(uploads, student.id, &submission).await?;

    let record = application::ActiveModel {
        student_id: Set(student.id),
        scholarship_id: Set(scholarship.id),
        status: Set(ApplicationStatus::Pending),
        submitted_at: Set(Utc::now()),
        reviewed_by: Set(None),
        remarks: Set(None),
        income_proof_path: Set(documents.income_proof.clone()),
        govt_id_path: Set(documents.govt_id.clone()),
        cgpa_value: Set(cgpa),
        ..Default::default()
    };

    let created = insert_pending(db, uploads, record, &documents).await?;

    tracing::info!(
        application_id = created.id,
        student_id = student.id,
        scholarship_id = scholarship.id,
        "Application submitted"
    );
    Ok(created)
}

/// Stored paths written for one submission
#[derive(Debug, Default)]
struct StoredDocuments {
    income_proof: Option<String>,
    govt_id: Option<String>,
}

impl StoredDocuments {
    fn paths(&self) -> impl Iterator<Item = &str> {
        self.income_proof
            .as_deref()
            .into_iter()
            .chain(self.govt_id.as_deref())
    }

    async fn discard(&self, uploads: &UploadStore) {
        for path in self.paths() {
            uploads.remove(path).await;
        }
    }
}

/// Write the submission's documents; on failure remove whatever was written
async fn store_documents(
    uploads: &UploadStore,
    student_id: i64,
    submission: &NewApplication,
) -> Result<StoredDocuments> {
    let mut stored = StoredDocuments::default();

    if let Some(upload) = &submission.income_proof {
        match uploads.save(student_id, upload).await {
            Ok(path) => stored.income_proof = Some(path),
            Err(e) => {
                stored.discard(uploads).await;
                return Err(e.into());
            }
        }
    }

    if let Some(upload) = &submission.govt_id {
        match uploads.save(student_id, upload).await {
            Ok(path) => stored.govt_id = Some(path),
            Err(e) => {
                stored.discard(uploads).await;
                return Err(e.into());
            }
        }
    }

    Ok(stored)
}

/// Insert the application row, removing this submission's files if it fails.
///
/// A unique violation on (student, scholarship) means a concurrent
/// submission won and is reported as `duplicate`.
async fn insert_pending<C: ConnectionTrait>(
    db: &C,
    uploads: &UploadStore,
    record: application::ActiveModel,
    documents: &StoredDocuments,
) -> Result<application::Model> {
    match record.insert(db).await {
        Ok(model) => Ok(model),
        Err(e) => {
            documents.discard(uploads).await;
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                tracing::info!("Concurrent duplicate application rejected");
                return Err(Denial::Duplicate.into());
            }
            Err(e.into())
        }
    }
}

/// Record an admin decision on a pending application.
///
/// The status change only applies while the row is still pending, so
/// concurrent or repeated decisions cannot allocate the same application
/// twice. Approvals add the scholarship amount to `year`'s finance record.
pub async fn decide_application<C>(
    db: &C,
    application_id: i64,
    requested_status: &str,
    reviewer_id: i64,
    remarks: Option<String>,
    year: i32,
) -> Result<application::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let current = Application::find_by_id(application_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("not_found".to_string()))?;

    let status = validate_decision(current.status, requested_status)?;
    let remarks = remarks.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());

    let updated = Application::update_many()
        .col_expr(application::Column::Status, Expr::value(status))
        .col_expr(application::Column::ReviewedBy, Expr::value(reviewer_id))
        .col_expr(application::Column::Remarks, Expr::value(remarks))
        .filter(application::Column::Id.eq(current.id))
        .filter(application::Column::Status.eq(ApplicationStatus::Pending))
        .exec(&txn)
        .await?;

    if updated.rows_affected == 0 {
        return Err(DecisionError::AlreadyDecided.into());
    }

    if status == ApplicationStatus::Approved {
        let scholarship = find_scholarship(&txn, current.scholarship_id).await?;
        finance::record_allocation(&txn, year, scholarship.amount).await?;
    }

    let decided = Application::find_by_id(current.id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("not_found".to_string()))?;

    txn.commit().await?;

    tracing::info!(
        application_id = decided.id,
        reviewer_id,
        status = %decided.status,
        "Decision recorded"
    );
    Ok(decided)
}

/// Application joined with its student and scholarship, ready for display
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub id: i64,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub remarks: Option<String>,
    pub cgpa_value: Option<f64>,
    pub student_id: i64,
    pub student_name: String,
    pub department: Option<String>,
    pub scholarship_id: i64,
    pub scholarship_name: String,
    pub amount: f64,
    pub income_proof_url: String,
    pub income_proof_is_pdf: bool,
    pub govt_id_url: String,
    pub govt_id_is_pdf: bool,
    pub reviewed_by: Option<i64>,
}

fn document(path: &Option<String>) -> (String, bool) {
    let path = path.as_deref().unwrap_or_default();
    (upload_url(path), is_pdf(path))
}

async fn into_views<C: ConnectionTrait>(
    db: &C,
    items: Vec<application::Model>,
) -> Result<Vec<ApplicationView>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let mut student_ids: Vec<i64> = items.iter().map(|a| a.student_id).collect();
    student_ids.sort_unstable();
    student_ids.dedup();
    let mut scholarship_ids: Vec<i64> = items.iter().map(|a| a.scholarship_id).collect();
    scholarship_ids.sort_unstable();
    scholarship_ids.dedup();

    let students: HashMap<i64, user::Model> = User::find()
        .filter(user::Column::Id.is_in(student_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let scholarships: HashMap<i64, scholarship::Model> = Scholarship::find()
        .filter(scholarship::Column::Id.is_in(scholarship_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    Ok(items
        .into_iter()
        .map(|item| {
            let student = students.get(&item.student_id);
            let scholarship = scholarships.get(&item.scholarship_id);
            let (income_proof_url, income_proof_is_pdf) = document(&item.income_proof_path);
            let (govt_id_url, govt_id_is_pdf) = document(&item.govt_id_path);

            ApplicationView {
                id: item.id,
                status: item.status,
                submitted_at: item.submitted_at,
                remarks: item.remarks,
                cgpa_value: item.cgpa_value,
                student_id: item.student_id,
                student_name: student.map(|s| s.name.clone()).unwrap_or_default(),
                department: student.and_then(|s| s.department.clone()),
                scholarship_id: item.scholarship_id,
                scholarship_name: scholarship.map(|s| s.name.clone()).unwrap_or_default(),
                amount: scholarship.map(|s| s.amount).unwrap_or_default(),
                income_proof_url,
                income_proof_is_pdf,
                govt_id_url,
                govt_id_is_pdf,
                reviewed_by: item.reviewed_by,
            }
        })
        .collect())
}

/// A student's own applications, newest first
pub async fn list_for_student<C: ConnectionTrait>(
    db: &C,
    student_id: i64,
) -> Result<Vec<ApplicationView>> {
    let items = Application::find()
        .filter(application::Column::StudentId.eq(student_id))
        .order_by_desc(application::Column::SubmittedAt)
        .order_by_desc(application::Column::Id)
        .all(db)
        .await?;
    into_views(db, items).await
}

/// All applications, optionally narrowed to one status, newest first
pub async fn list_applications<C: ConnectionTrait>(
    db: &C,
    status: Option<ApplicationStatus>,
) -> Result<Vec<ApplicationView>> {
    let mut query = Application::find();
    if let Some(status) = status {
        query = query.filter(application::Column::Status.eq(status));
    }
    let items = query
        .order_by_desc(application::Column::SubmittedAt)
        .order_by_desc(application::Column::Id)
        .all(db)
        .await?;
    into_views(db, items).await
}

/// The `limit` most recently submitted applications with `status`
pub async fn recent_with_status<C: ConnectionTrait>(
    db: &C,
    status: ApplicationStatus,
    limit: u64,
) -> Result<Vec<ApplicationView>> {
    let items = Application::find()
        .filter(application::Column::Status.eq(status))
        .order_by_desc(application::Column::SubmittedAt)
        .order_by_desc(application::Column::Id)
        .limit(limit)
        .all(db)
        .await?;
    into_views(db, items).await
}
