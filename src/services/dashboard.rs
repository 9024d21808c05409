//! Admin dashboard aggregates.

use std::collections::BTreeMap;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QuerySelect,
    RelationTrait,
};
use serde::Serialize;

use crate::error::Result;
use crate::models::prelude::*;
use crate::models::{application, scholarship, user, ApplicationStatus, Role};
use crate::services::applications::{recent_with_status, ApplicationView};
use crate::services::finance::{self, FundReport};

/// How many items each "recent" list holds
pub const RECENT_LIMIT: u64 = 5;

/// Department label for students without one
const NO_DEPARTMENT: &str = "Unspecified";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecentApplications {
    pub pending: Vec<ApplicationView>,
    pub approved: Vec<ApplicationView>,
    pub rejected: Vec<ApplicationView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_students: u64,
    pub applications: StatusCounts,
    /// Sum of scholarship amounts over approved applications
    pub total_allocated: f64,
    pub by_category: BTreeMap<String, i64>,
    pub by_department: BTreeMap<String, i64>,
    /// Finance record for the current year, if one exists
    pub finance: Option<FundReport>,
    pub recent: RecentApplications,
}

async fn count_with_status<C: ConnectionTrait>(db: &C, status: ApplicationStatus) -> Result<u64> {
    Ok(Application::find()
        .filter(application::Column::Status.eq(status))
        .count(db)
        .await?)
}

pub async fn status_counts<C: ConnectionTrait>(db: &C) -> Result<StatusCounts> {
    Ok(StatusCounts {
        pending: count_with_status(db, ApplicationStatus::Pending).await?,
        approved: count_with_status(db, ApplicationStatus::Approved).await?,
        rejected: count_with_status(db, ApplicationStatus::Rejected).await?,
    })
}

pub async fn total_allocated<C: ConnectionTrait>(db: &C) -> Result<f64> {
    let total: Option<Option<f64>> = Scholarship::find()
        .select_only()
        .column_as(
            Expr::col((scholarship::Entity, scholarship::Column::Amount)).sum(),
            "total",
        )
        .join(JoinType::InnerJoin, scholarship::Relation::Applications.def())
        .filter(application::Column::Status.eq(ApplicationStatus::Approved))
        .into_tuple()
        .one(db)
        .await?;

    Ok(total.flatten().unwrap_or(0.0))
}

pub async fn scholarships_by_category<C: ConnectionTrait>(db: &C) -> Result<BTreeMap<String, i64>> {
    let rows: Vec<(String, i64)> = Scholarship::find()
        .select_only()
        .column(scholarship::Column::Category)
        .column_as(
            Expr::col((scholarship::Entity, scholarship::Column::Id)).count(),
            "count",
        )
        .group_by(scholarship::Column::Category)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows.into_iter().collect())
}

/// Application counts keyed by the applying student's department
pub async fn applications_by_department<C: ConnectionTrait>(
    db: &C,
) -> Result<BTreeMap<String, i64>> {
    let rows: Vec<(Option<String>, i64)> = User::find()
        .select_only()
        .column(user::Column::Department)
        .column_as(
            Expr::col((application::Entity, application::Column::Id)).count(),
            "count",
        )
        .join(JoinType::InnerJoin, user::Relation::Applications.def())
        .filter(user::Column::Role.eq(Role::Student))
        .group_by(user::Column::Department)
        .into_tuple()
        .all(db)
        .await?;

    let mut by_department = BTreeMap::new();
    for (department, count) in rows {
        let key = department
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| NO_DEPARTMENT.to_string());
        *by_department.entry(key).or_insert(0) += count;
    }
    Ok(by_department)
}

pub async fn summary<C: ConnectionTrait>(db: &C, year: i32) -> Result<DashboardSummary> {
    let total_students = User::find()
        .filter(user::Column::Role.eq(Role::Student))
        .count(db)
        .await?;

    let finance = finance::find_year(db, year)
        .await?
        .as_ref()
        .map(FundReport::from);

    Ok(DashboardSummary {
        total_students,
        applications: status_counts(db).await?,
        total_allocated: total_allocated(db).await?,
        by_category: scholarships_by_category(db).await?,
        by_department: applications_by_department(db).await?,
        finance,
        recent: RecentApplications {
            pending: recent_with_status(db, ApplicationStatus::Pending, RECENT_LIMIT).await?,
            approved: recent_with_status(db, ApplicationStatus::Approved, RECENT_LIMIT).await?,
            rejected: recent_with_status(db, ApplicationStatus::Rejected, RECENT_LIMIT).await?,
        },
    })
}
