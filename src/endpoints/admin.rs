use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::endpoints::api::CreatedScholarship;
use crate::error::Result;
use crate::middleware::{require_role, CurrentSession};
use crate::models::{finance as finance_model, scholarship, user, ApplicationStatus, Role};
use crate::services::applications::{decide_application, list_applications, ApplicationView};
use crate::services::current_year;
use crate::services::dashboard::{self, DashboardSummary};
use crate::services::finance::{self, FundReport};
use crate::services::scholarships::{self, ScholarshipRequest};
use crate::services::users::list_students;
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin_dashboard))
        .route("/students", get(students))
        .route(
            "/scholarships",
            get(list_scholarships).post(create_scholarship),
        )
        .route("/scholarships/{scholarship_id}/delete", post(delete_scholarship))
        .route("/applications", get(applications))
        .route("/applications/{application_id}/decision", post(decision))
        .route("/finance", get(finance_years).post(save_finance))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApplicationsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    #[serde(default)]
    pub status: String,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub ok: bool,
    pub application_id: i64,
    pub status: ApplicationStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FinanceRequest {
    #[validate(range(min = 1900, max = 9999))]
    pub year: i32,
    #[validate(range(min = 0.0))]
    pub budget_amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct FinanceResponse {
    pub ok: bool,
    pub finance: FundReport,
}

// ============================================================================
// Handlers
// ============================================================================

async fn admin_dashboard(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<DashboardSummary>> {
    require_role(&session, &[Role::Admin])?;
    Ok(Json(dashboard::summary(&state.db, current_year()).await?))
}

async fn students(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<Vec<user::Model>>> {
    require_role(&session, &[Role::Admin])?;
    Ok(Json(list_students(&state.db).await?))
}

async fn list_scholarships(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<Vec<scholarship::Model>>> {
    require_role(&session, &[Role::Admin])?;
    Ok(Json(scholarships::list_all_by_end_date_desc(&state.db).await?))
}

async fn create_scholarship(
    State(state): State<AppState>,
    session: CurrentSession,
    payload: std::result::Result<Json<ScholarshipRequest>, JsonRejection>,
) -> Result<Json<CreatedScholarship>> {
    require_role(&session, &[Role::Admin])?;
    let Json(request) = payload?;

    let created = scholarships::create_scholarship(&state.db, request).await?;

    Ok(Json(CreatedScholarship {
        ok: true,
        scholarship_id: created.id,
    }))
}

/// Delete a scholarship and every application made to it
async fn delete_scholarship(
    State(state): State<AppState>,
    session: CurrentSession,
    scholarship_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>> {
    require_role(&session, &[Role::Admin])?;
    let Path(scholarship_id) = scholarship_id?;

    scholarships::delete_scholarship(&state.db, scholarship_id).await?;

    Ok(Json(serde_json::json!({ "ok": true })))
}

/// Applications, newest first. Unknown `status` values list everything.
async fn applications(
    State(state): State<AppState>,
    session: CurrentSession,
    Query(query): Query<ApplicationsQuery>,
) -> Result<Json<Vec<ApplicationView>>> {
    require_role(&session, &[Role::Admin])?;

    let status = query.status.as_deref().and_then(ApplicationStatus::parse);
    Ok(Json(list_applications(&state.db, status).await?))
}

async fn decision(
    State(state): State<AppState>,
    session: CurrentSession,
    application_id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<DecisionRequest>, JsonRejection>,
) -> Result<Json<DecisionResponse>> {
    let admin = require_role(&session, &[Role::Admin])?;
    let Path(application_id) = application_id?;
    let Json(request) = payload?;

    let decided = decide_application(
        &state.db,
        application_id,
        &request.status,
        admin.id,
        request.remarks,
        current_year(),
    )
    .await?;

    Ok(Json(DecisionResponse {
        ok: true,
        application_id: decided.id,
        status: decided.status,
    }))
}

/// Ledger rows, newest year first
async fn finance_years(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<Vec<finance_model::Model>>> {
    require_role(&session, &[Role::Admin])?;
    Ok(Json(finance::list_years(&state.db).await?))
}

async fn save_finance(
    State(state): State<AppState>,
    session: CurrentSession,
    payload: std::result::Result<Json<FinanceRequest>, JsonRejection>,
) -> Result<Json<FinanceResponse>> {
    require_role(&session, &[Role::Admin])?;
    let Json(request) = payload?;
    request.validate()?;

    let saved = finance::set_budget(
        &state.db,
        request.year,
        request.budget_amount.unwrap_or(0.0),
    )
    .await?;

    Ok(Json(FinanceResponse {
        ok: true,
        finance: FundReport::from(&saved),
    }))
}
