use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::endpoints::api::CreatedApplication;
use crate::error::{AppError, Result};
use crate::middleware::{require_role, CurrentSession};
use crate::models::{scholarship, user, Role};
use crate::services::applications::{
    list_for_student, submit_application, ApplicationView, NewApplication,
};
use crate::services::scholarships::list_open;
use crate::services::today;
use crate::services::uploads::PendingUpload;
use crate::services::users::{update_profile, ProfileUpdate};
use crate::state::AppState;

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/scholarships", get(open_scholarships))
        .route("/apply/{scholarship_id}", post(apply))
        .route("/profile", get(profile).post(save_profile))
}

#[derive(Debug, Serialize)]
pub struct StudentDashboard {
    pub student: user::Model,
    pub applications: Vec<ApplicationView>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub ok: bool,
    pub user: user::Model,
}

async fn dashboard(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<StudentDashboard>> {
    let student = require_role(&session, &[Role::Student])?;

    let applications = list_for_student(&state.db, student.id).await?;

    Ok(Json(StudentDashboard {
        student: student.clone(),
        applications,
    }))
}

/// Scholarships open today, soonest-closing first
async fn open_scholarships(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<Vec<scholarship::Model>>> {
    require_role(&session, &[Role::Student])?;
    Ok(Json(list_open(&state.db, today()).await?))
}

/// Read the multipart form fully before anything is stored.
///
/// Recognised fields: `cgpa` (text), `income_proof` and `govt_id` (files).
/// File fields sent without a filename are treated as absent.
async fn read_submission(multipart: &mut Multipart) -> Result<NewApplication> {
    let mut submission = NewApplication::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cgpa" => {
                let text = field.text().await?;
                let text = text.trim();
                if !text.is_empty() {
                    let value = text.parse::<f64>().map_err(|_| AppError::invalid_fields())?;
                    submission.cgpa = Some(value);
                }
            }
            "income_proof" | "govt_id" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                if file_name.is_empty() {
                    continue;
                }
                let bytes = field.bytes().await?;
                let upload = PendingUpload::new(&file_name, bytes.to_vec())?;
                if name == "income_proof" {
                    submission.income_proof = Some(upload);
                } else {
                    submission.govt_id = Some(upload);
                }
            }
            _ => {}
        }
    }

    Ok(submission)
}

async fn apply(
    State(state): State<AppState>,
    session: CurrentSession,
    scholarship_id: std::result::Result<Path<i64>, PathRejection>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedApplication>)> {
    let student = require_role(&session, &[Role::Student])?;
    let Path(scholarship_id) = scholarship_id?;

    let submission = read_submission(&mut multipart).await?;
    let created = submit_application(
        &state.db,
        &state.uploads,
        student,
        scholarship_id,
        submission,
        today(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedApplication {
            ok: true,
            application_id: created.id,
        }),
    ))
}

async fn profile(session: CurrentSession) -> Result<Json<user::Model>> {
    let student = require_role(&session, &[Role::Student])?;
    Ok(Json(student.clone()))
}

async fn save_profile(
    State(state): State<AppState>,
    session: CurrentSession,
    payload: std::result::Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<ProfileResponse>> {
    let student = require_role(&session, &[Role::Student])?;
    let Json(update) = payload?;

    let user = update_profile(&state.db, student.clone(), update).await?;

    Ok(Json(ProfileResponse { ok: true, user }))
}
