//! JSON API mirroring the student and admin pages.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::endpoints::auth::login;
use crate::error::Result;
use crate::middleware::{require_login, require_role, CurrentSession};
use crate::models::{scholarship, Role};
use crate::services::applications::{decide_application, submit_application, NewApplication};
use crate::services::finance::{self, FundReport};
use crate::services::scholarships::{self, ScholarshipRequest};
use crate::services::{current_year, today};
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route(
            "/scholarships",
            get(list_scholarships).post(create_scholarship),
        )
        .route("/apply", post(apply))
        .route("/approve", post(approve))
        .route("/fund-report/year", get(fund_report_year))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreatedScholarship {
    pub ok: bool,
    pub scholarship_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub scholarship_id: i64,
    pub cgpa: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CreatedApplication {
    pub ok: bool,
    pub application_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub application_id: i64,
    #[serde(default)]
    pub status: String,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FundReportQuery {
    pub year: Option<i32>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_scholarships(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<Vec<scholarship::Model>>> {
    require_login(&session)?;
    Ok(Json(scholarships::list_all(&state.db).await?))
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

/// Apply without documents
async fn apply(
    State(state): State<AppState>,
    session: CurrentSession,
    payload: std::result::Result<Json<ApplyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedApplication>)> {
    let student = require_role(&session, &[Role::Student])?;
    let Json(request) = payload?;

    let submission = NewApplication {
        cgpa: request.cgpa,
        ..Default::default()
    };
    let created = submit_application(
        &state.db,
        &state.uploads,
        student,
        request.scholarship_id,
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

async fn approve(
    State(state): State<AppState>,
    session: CurrentSession,
    payload: std::result::Result<Json<ApproveRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let admin = require_role(&session, &[Role::Admin])?;
    let Json(request) = payload?;

    decide_application(
        &state.db,
        request.application_id,
        &request.status,
        admin.id,
        request.remarks,
        current_year(),
    )
    .await?;

    Ok(Json(serde_json::json!({ "ok": true })))
}

/// Budget, allocation and balance for `?year=` (defaults to this year)
async fn fund_report_year(
    State(state): State<AppState>,
    session: CurrentSession,
    query: std::result::Result<Query<FundReportQuery>, QueryRejection>,
) -> Result<Json<FundReport>> {
    require_login(&session)?;
    let Query(query) = query?;

    let year = query.year.unwrap_or_else(current_year);
    Ok(Json(finance::report(&state.db, year).await?))
}
