//! Demo data: one admin, one student, two open scholarships and a budget
//! for the current year. Every step is skipped when its data already exists.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set};

use crate::error::Result;
use crate::models::prelude::*;
use crate::models::{scholarship, user, Role};
use crate::services::finance;
use crate::services::security::CredentialStore;
use crate::services::users::find_by_email;

pub const DEMO_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEMO_STUDENT_EMAIL: &str = "student@example.com";
pub const DEMO_BUDGET: f64 = 500000.0;

/// What a seeding run actually inserted
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub admin: bool,
    pub student: bool,
    pub scholarships: bool,
    pub finance: bool,
}

struct DemoUser {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
    department: Option<&'static str>,
    cgpa: Option<f64>,
    family_income: Option<f64>,
}

const DEMO_USERS: [DemoUser; 2] = [
    DemoUser {
        name: "Admin",
        email: DEMO_ADMIN_EMAIL,
        password: "admin123",
        role: Role::Admin,
        department: None,
        cgpa: None,
        family_income: None,
    },
    DemoUser {
        name: "Student One",
        email: DEMO_STUDENT_EMAIL,
        password: "student123",
        role: Role::Student,
        department: Some("CSE"),
        cgpa: Some(8.2),
        family_income: Some(250000.0),
    },
];

async fn seed_user<C: ConnectionTrait>(
    db: &C,
    credentials: &CredentialStore,
    demo: &DemoUser,
) -> Result<bool> {
    if find_by_email(db, demo.email).await?.is_some() {
        return Ok(false);
    }

    user::ActiveModel {
        name: Set(demo.name.to_string()),
        email: Set(demo.email.to_string()),
        password_hash: Set(credentials.hash(demo.password)?),
        role: Set(demo.role),
        department: Set(demo.department.map(str::to_string)),
        cgpa: Set(demo.cgpa),
        family_income: Set(demo.family_income),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("Seeded {} account {}", demo.role, demo.email);
    Ok(true)
}

async fn seed_scholarships<C: ConnectionTrait>(db: &C, today: NaiveDate) -> Result<bool> {
    if Scholarship::find().count(db).await? > 0 {
        return Ok(false);
    }

    let demo = [
        scholarship::ActiveModel {
            name: Set("Merit Excellence".to_string()),
            category: Set("merit".to_string()),
            eligibility: Set("CGPA >= 8.0".to_string()),
            amount: Set(20000.0),
            start_date: Set(today),
            end_date: Set(today + Duration::days(60)),
            min_cgpa: Set(Some(8.0)),
            income_limit: Set(None),
            ..Default::default()
        },
        scholarship::ActiveModel {
            name: Set("Need Based Support".to_string()),
            category: Set("financial".to_string()),
            eligibility: Set("Income <= 3L".to_string()),
            amount: Set(30000.0),
            start_date: Set(today),
            end_date: Set(today + Duration::days(45)),
            min_cgpa: Set(None),
            income_limit: Set(Some(300000.0)),
            ..Default::default()
        },
    ];
    Scholarship::insert_many(demo).exec(db).await?;

    tracing::info!("Seeded demo scholarships");
    Ok(true)
}

/// Insert demo data that is not already present
pub async fn seed_demo_data<C: ConnectionTrait>(
    db: &C,
    credentials: &CredentialStore,
    today: NaiveDate,
) -> Result<SeedReport> {
    let [admin, student] = &DEMO_USERS;

    let mut report = SeedReport {
        admin: seed_user(db, credentials, admin).await?,
        student: seed_user(db, credentials, student).await?,
        scholarships: seed_scholarships(db, today).await?,
        finance: false,
    };

    if finance::find_year(db, today.year()).await?.is_none() {
        finance::set_budget(db, today.year(), DEMO_BUDGET).await?;
        tracing::info!("Seeded finance for {}", today.year());
        report.finance = true;
    }

    Ok(report)
}
