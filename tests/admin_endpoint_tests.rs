//! Admin pages: dashboard, students, scholarships, review and finance.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Duration};
use sea_orm::{EntityTrait, PaginatorTrait};

use common::*;
use scholarhub::models::prelude::*;
use scholarhub::models::Role;
use scholarhub::services::{finance, today};

async fn admin_cookie(app: &TestApp) -> String {
    create_user(app, "Root", "root@example.com", Role::Admin).await;
    login(app, "root@example.com", PASSWORD).await
}

/// Apply through the JSON route and return the new application id
async fn apply(app: &TestApp, cookie: &str, scholarship_id: i64, cgpa: f64) -> i64 {
    let (status, body) = post_json(
        app,
        "/api/apply",
        Some(cookie),
        serde_json::json!({ "scholarship_id": scholarship_id, "cgpa": cgpa }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["application_id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_student_cannot_use_admin_pages() {
    let app = test_app().await;
    create_user(&app, "Ada", "ada@example.com", Role::Student).await;
    let cookie = login(&app, "ada@example.com", PASSWORD).await;

    for uri in [
        "/admin/dashboard",
        "/admin/students",
        "/admin/scholarships",
        "/admin/applications",
        "/admin/finance",
    ] {
        let (status, body) = get_json(&app, uri, Some(&cookie)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
        assert_eq!(body["error"], "forbidden");
    }

    let (status, _) = get_json(&app, "/admin/dashboard", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard_aggregates() {
    let app = test_app().await;
    let admin = admin_cookie(&app).await;
    let year = today().year();
    finance::set_budget(&app.state.db, year, 100000.0).await.unwrap();

    create_student_with_profile(&app, "Ada", "ada@example.com", "CSE", None).await;
    create_student_with_profile(&app, "Bob", "bob@example.com", "ECE", None).await;
    create_user(&app, "Cy", "cy@example.com", Role::Student).await;

    let big = create_open_scholarship(&app, "Big", 30000.0, None, None).await;
    let small = create_open_scholarship(&app, "Small", 5000.0, None, None).await;

    let ada = login(&app, "ada@example.com", PASSWORD).await;
    let bob = login(&app, "bob@example.com", PASSWORD).await;
    let cy = login(&app, "cy@example.com", PASSWORD).await;

    let approved = apply(&app, &ada, big.id, 9.0).await;
    let rejected = apply(&app, &bob, big.id, 7.0).await;
    apply(&app, &ada, small.id, 9.0).await;
    apply(&app, &cy, small.id, 8.0).await;

    for (id, status) in [(approved, "approved"), (rejected, "rejected")] {
        let (code, _) = post_json(
            &app,
            &format!("/admin/applications/{}/decision", id),
            Some(&admin),
            serde_json::json!({ "status": status }),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
    }

    let (status, body) = get_json(&app, "/admin/dashboard", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_students"], 3);
    assert_eq!(body["applications"]["pending"], 2);
    assert_eq!(body["applications"]["approved"], 1);
    assert_eq!(body["applications"]["rejected"], 1);
    assert_eq!(body["total_allocated"], 30000.0);
    assert_eq!(body["by_category"]["merit"], 2);
    assert_eq!(body["by_department"]["CSE"], 2);
    assert_eq!(body["by_department"]["ECE"], 1);
    assert_eq!(body["by_department"]["Unspecified"], 1);
    assert_eq!(body["finance"]["allocated"], 30000.0);
    assert_eq!(body["finance"]["balance"], 70000.0);
    assert_eq!(body["recent"]["pending"].as_array().unwrap().len(), 2);
    assert_eq!(body["recent"]["approved"][0]["id"], approved);
}

#[tokio::test]
async fn test_students_listed_by_name() {
    let app = test_app().await;
    let admin = admin_cookie(&app).await;
    create_user(&app, "Zoe", "zoe@example.com", Role::Student).await;
    create_user(&app, "Ada", "ada@example.com", Role::Student).await;

    let (status, body) = get_json(&app, "/admin/students", Some(&admin)).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ada", "Zoe"]);
    assert!(body[0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_scholarship_management() {
    let app = test_app().await;
    let admin = admin_cookie(&app).await;
    let today = today();

    let early = create_scholarship(&app, "Early", 100.0, today, today + Duration::days(5), None, None).await;

    let (status, body) = post_json(
        &app,
        "/admin/scholarships",
        Some(&admin),
        serde_json::json!({
            "name": "Late",
            "category": "need",
            "eligibility": "Family income under 3 lakh",
            "amount": 15000,
            "start_date": today.format("%Y-%m-%d").to_string(),
            "end_date": (today + Duration::days(90)).format("%Y-%m-%d").to_string(),
            "income_limit": 300000
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let late = body["scholarship_id"].as_i64().unwrap();

    let (_, body) = get_json(&app, "/admin/scholarships", Some(&admin)).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![late, early.id]);
}

#[tokio::test]
async fn test_delete_scholarship_removes_applications() {
    let app = test_app().await;
    let admin = admin_cookie(&app).await;
    create_user(&app, "Ada", "ada@example.com", Role::Student).await;
    let sch = create_open_scholarship(&app, "Merit", 20000.0, None, None).await;
    let other = create_open_scholarship(&app, "Other", 1000.0, None, None).await;

    let ada = login(&app, "ada@example.com", PASSWORD).await;
    apply(&app, &ada, sch.id, 9.0).await;
    apply(&app, &ada, other.id, 9.0).await;

    let (status, body) = post_json(
        &app,
        &format!("/admin/scholarships/{}/delete", sch.id),
        Some(&admin),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    assert_eq!(Scholarship::find().count(&app.state.db).await.unwrap(), 1);
    assert_eq!(Application::find().count(&app.state.db).await.unwrap(), 1);

    let (status, body) = post_json(
        &app,
        &format!("/admin/scholarships/{}/delete", sch.id),
        Some(&admin),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_applications_filter() {
    let app = test_app().await;
    let admin = admin_cookie(&app).await;
    create_user(&app, "Ada", "ada@example.com", Role::Student).await;
    let first = create_open_scholarship(&app, "First", 1000.0, None, None).await;
    let second = create_open_scholarship(&app, "Second", 2000.0, None, None).await;

    let ada = login(&app, "ada@example.com", PASSWORD).await;
    let approved = apply(&app, &ada, first.id, 9.0).await;
    let pending = apply(&app, &ada, second.id, 9.0).await;

    post_json(
        &app,
        &format!("/admin/applications/{}/decision", approved),
        Some(&admin),
        serde_json::json!({ "status": "approved", "remarks": "Strong record" }),
    )
    .await;

    let (_, body) = get_json(&app, "/admin/applications?status=pending", Some(&admin)).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], pending);
    assert_eq!(items[0]["student_name"], "Ada");

    let (_, body) = get_json(&app, "/admin/applications?status=approved", Some(&admin)).await;
    assert_eq!(body[0]["id"], approved);
    assert_eq!(body[0]["remarks"], "Strong record");

    let (_, body) = get_json(&app, "/admin/applications?status=bogus", Some(&admin)).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = get_json(&app, "/admin/applications", Some(&admin)).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_decision_outcomes() {
    let app = test_app().await;
    let admin = admin_cookie(&app).await;
    create_user(&app, "Ada", "ada@example.com", Role::Student).await;
    let sch = create_open_scholarship(&app, "Merit", 20000.0, None, None).await;
    let ada = login(&app, "ada@example.com", PASSWORD).await;
    let id = apply(&app, &ada, sch.id, 9.0).await;
    let uri = format!("/admin/applications/{}/decision", id);

    let (status, body) = post_json(&app, &uri, Some(&admin), serde_json::json!({ "status": "pending" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_status");

    let (status, body) = post_json(&app, &uri, Some(&admin), serde_json::json!({ "status": "rejected" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["application_id"], id);
    assert_eq!(body["status"], "rejected");

    let (status, body) = post_json(&app, &uri, Some(&admin), serde_json::json!({ "status": "approved" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "already_decided");

    let (status, body) = post_json(
        &app,
        "/admin/applications/9999/decision",
        Some(&admin),
        serde_json::json!({ "status": "approved" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = post_json(&app, &uri, Some(&ada), serde_json::json!({ "status": "approved" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_finance_budget_keeps_allocation() {
    let app = test_app().await;
    let admin = admin_cookie(&app).await;
    let year = today().year();

    let (status, body) = post_json(
        &app,
        "/admin/finance",
        Some(&admin),
        serde_json::json!({ "year": year, "budget_amount": 50000 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["finance"]["budget"], 50000.0);
    assert_eq!(body["finance"]["balance"], 50000.0);

    finance::record_allocation(&app.state.db, year, 20000.0).await.unwrap();

    let (_, body) = post_json(
        &app,
        "/admin/finance",
        Some(&admin),
        serde_json::json!({ "year": year, "budget_amount": 10000 }),
    )
    .await;
    assert_eq!(body["finance"]["allocated"], 20000.0);
    assert_eq!(body["finance"]["balance"], 0.0);

    post_json(
        &app,
        "/admin/finance",
        Some(&admin),
        serde_json::json!({ "year": year - 1 }),
    )
    .await;

    let (status, body) = get_json(&app, "/admin/finance", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let years: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["year"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![year as i64, (year - 1) as i64]);
    assert_eq!(body[1]["budget_amount"], 0.0);
}

#[tokio::test]
async fn test_finance_rejects_bad_input() {
    let app = test_app().await;
    let admin = admin_cookie(&app).await;

    for payload in [
        serde_json::json!({ "year": 12, "budget_amount": 100 }),
        serde_json::json!({ "year": 2024, "budget_amount": -5 }),
        serde_json::json!({ "budget_amount": 100 }),
    ] {
        let (status, body) = post_json(&app, "/admin/finance", Some(&admin), payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing_or_invalid_fields");
    }

    assert_eq!(Finance::find().count(&app.state.db).await.unwrap(), 0);
}
