//! Eligibility and application rules.
//!
//! Pure decisions with no database access: callers look up whether the
//! student already applied and pass today's date in.

use chrono::NaiveDate;
use thiserror::Error;

use crate::error::AppError;
use crate::models::{scholarship, user, ApplicationStatus};

/// Reason a student may not apply to a scholarship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("an application for this scholarship already exists")]
    Duplicate,
    #[error("the scholarship is not open for applications")]
    ScholarshipClosed,
    #[error("submitted CGPA is below the scholarship minimum")]
    CgpaBelowMinimum,
    #[error("family income exceeds the scholarship limit")]
    IncomeExceedsLimit,
}

impl Denial {
    pub fn code(&self) -> &'static str {
        match self {
            Denial::Duplicate => "duplicate",
            Denial::ScholarshipClosed => "scholarship_closed",
            Denial::CgpaBelowMinimum => "cgpa_below_minimum",
            Denial::IncomeExceedsLimit => "income_exceeds_limit",
        }
    }
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Duplicate => AppError::Conflict(denial.code().to_string()),
            _ => AppError::BadRequest(denial.code().to_string()),
        }
    }
}

/// Decide whether `student` may apply to `scholarship`.
///
/// Checks run in order: duplicate, open window, minimum CGPA, income limit.
/// A missing submitted CGPA counts as 0. The income check is skipped when
/// the student has no recorded family income.
pub fn can_apply(
    student: &user::Model,
    scholarship: &scholarship::Model,
    submitted_cgpa: Option<f64>,
    already_applied: bool,
    today: NaiveDate,
) -> Result<(), Denial> {
    if already_applied {
        return Err(Denial::Duplicate);
    }

    if !scholarship.is_open_on(today) {
        return Err(Denial::ScholarshipClosed);
    }

    if let Some(min_cgpa) = scholarship.min_cgpa {
        if submitted_cgpa.unwrap_or(0.0) < min_cgpa {
            return Err(Denial::CgpaBelowMinimum);
        }
    }

    if let (Some(limit), Some(income)) = (scholarship.income_limit, student.family_income) {
        if income > limit {
            return Err(Denial::IncomeExceedsLimit);
        }
    }

    Ok(())
}

/// Why a review decision was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("status must be approved or rejected")]
    InvalidStatus,
    #[error("application has already been decided")]
    AlreadyDecided,
}

impl DecisionError {
    pub fn code(&self) -> &'static str {
        match self {
            DecisionError::InvalidStatus => "invalid_status",
            DecisionError::AlreadyDecided => "already_decided",
        }
    }
}

impl From<DecisionError> for AppError {
    fn from(error: DecisionError) -> Self {
        AppError::BadRequest(error.code().to_string())
    }
}

/// Validate a requested review decision against the current status.
///
/// Only `approved` and `rejected` are accepted, and only from `pending`.
pub fn validate_decision(
    current: ApplicationStatus,
    requested: &str,
) -> Result<ApplicationStatus, DecisionError> {
    let status = match ApplicationStatus::parse(requested) {
        Some(s @ (ApplicationStatus::Approved | ApplicationStatus::Rejected)) => s,
        _ => return Err(DecisionError::InvalidStatus),
    };

    if current.is_terminal() {
        return Err(DecisionError::AlreadyDecided);
    }

    Ok(status)
}
