//! Fee records, overdue marking and reminder delivery against a real database
//!
//! Reminder delivery goes through `HttpMailer` pointed at a wiremock server.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use school_server::features::reminders::HttpMailer;

mod common;
use common::{
    app, app_with_mailer, assert_error, create_student, data_id, get, post, put,
    send_with_headers, TEST_CRON_SECRET,
};

async fn create_fee(app: &axum::Router, student_id: Uuid, due_date: &str) -> Uuid {
    let (status, body) = post(
        app,
        "/api/fees",
        json!({ "studentId": student_id, "dueDate": due_date }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create fee failed: {body}");
    data_id(&body)
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_fee_items_default_to_student_structure(pool: PgPool) -> sqlx::Result<()> {
    let app = app(pool);
    let student = create_student(&app, "ADM-1000", None).await;

    let (status, body) = post(
        &app,
        "/api/fees",
        json!({ "studentId": student, "dueDate": "2025-04-10" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["totalAmount"], 1500);
    assert_eq!(body["data"]["status"], "Pending");
    assert_eq!(
        body["data"]["feeItems"],
        json!([
            { "feeType": "Tuition", "amount": 1200 },
            { "feeType": "Transport", "amount": 300 },
        ])
    );

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_explicit_fee_items_are_totalled(pool: PgPool) -> sqlx::Result<()> {
    let app = app(pool);
    let student = create_student(&app, "ADM-1001", None).await;

    let (status, body) = post(
        &app,
        "/api/fees",
        json!({
            "studentId": student,
            "dueDate": "2025-04-10",
            "feeItems": [
                { "feeType": "Excursion", "amount": 450 },
                { "feeType": "Uniform", "amount": 800 },
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["totalAmount"], 1250);

    let (status, body) = post(
        &app,
        "/api/fees",
        json!({
            "studentId": student,
            "dueDate": "2025-04-10",
            "feeItems": [{ "feeType": "Refund", "amount": -10 }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "VALIDATION_ERROR");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_fee_for_unknown_student_is_not_found(pool: PgPool) -> sqlx::Result<()> {
    let app = app(pool);
    let (status, body) = post(
        &app,
        "/api/fees",
        json!({ "studentId": Uuid::new_v4(), "dueDate": "2025-04-10" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(assert_error(&body), "NOT_FOUND");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_paying_a_fee_once(pool: PgPool) -> sqlx::Result<()> {
    let app = app(pool);
    let student = create_student(&app, "ADM-1002", None).await;
    let fee = create_fee(&app, student, "2025-04-10").await;

    let (status, body) = post(&app, &format!("/api/fees/{fee}/pay"), json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "Paid");
    assert!(body["data"]["paidAt"].is_string());

    let (status, body) = post(&app, &format!("/api/fees/{fee}/pay"), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(assert_error(&body), "CONFLICT");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_blank_remarks_are_stored_as_null(pool: PgPool) -> sqlx::Result<()> {
    let app = app(pool);
    let student = create_student(&app, "ADM-1004", None).await;

    let (status, body) = post(
        &app,
        "/api/fees",
        json!({ "studentId": student, "dueDate": "2025-04-10", "remarks": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(body["data"]["remarks"].is_null());
    let fee = data_id(&body);

    let (_, body) = put(&app, &format!("/api/fees/{fee}"), json!({ "remarks": " Part paid " })).await;
    assert_eq!(body["data"]["remarks"], "Part paid");

    let (status, body) = put(&app, &format!("/api/fees/{fee}"), json!({ "remarks": "  " })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"]["remarks"].is_null());

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_mark_overdue_and_outstanding_overview(pool: PgPool) -> sqlx::Result<()> {
    let app = app(pool);
    let student = create_student(&app, "ADM-1003", None).await;
    create_fee(&app, student, "2025-04-10").await;
    create_fee(&app, student, "2025-06-10").await;

    let (status, body) = post(&app, "/api/fees/mark-overdue", json!({ "asOf": "2025-05-01" })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["updated"], 1);

    let (_, body) = get(&app, &format!("/api/fees?studentId={student}&status=Overdue")).await;
    assert_eq!(body["meta"]["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["admissionNumber"], "ADM-1003");

    let (status, body) = get(&app, &format!("/api/students/{student}/overview")).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["outstandingFees"]["totalOutstanding"], 3000);
    assert_eq!(
        body["data"]["outstandingFees"]["records"].as_array().map(Vec::len),
        Some(2)
    );

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_fee_reminders_are_delivered(pool: PgPool) -> sqlx::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .and(header("authorization", "Bearer mail-key"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let mailer = HttpMailer::new(
        format!("{}/send", server.uri()),
        Some("mail-key".to_string()),
        "accounts@greenfield.example".to_string(),
    )
    .expect("mailer");
    let app = app_with_mailer(pool.clone(), Arc::new(mailer));

    let with_email = create_student(&app, "ADM-1100", None).await;
    let fee = create_fee(&app, with_email, "2025-04-10").await;

    let (status, body) = post(
        &app,
        "/api/students",
        json!({
            "admissionNumber": "ADM-1101",
            "firstName": "Tara",
            "lastName": "Das",
            "feeStructure": { "tuition": 900 },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    create_fee(&app, data_id(&body), "2025-04-10").await;

    let auth = format!("Bearer {TEST_CRON_SECRET}");
    let (status, body) = send_with_headers(
        &app,
        Method::POST,
        "/api/emails/send-fee-reminders",
        Some(json!({ "asOf": "2025-05-01" })),
        &[("authorization", auth.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["markedOverdue"], 2);
    assert_eq!(body["data"]["sent"], 1);
    assert_eq!(body["data"]["failed"], 0);
    assert_eq!(body["data"]["skipped"], 1);

    let reminded: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_reminded_at FROM fee_records WHERE id = $1")
            .bind(fee)
            .fetch_one(&pool)
            .await?;
    assert!(reminded.is_some());

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_rejected_reminders_are_counted_as_failed(pool: PgPool) -> sqlx::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("mailbox unavailable"))
        .mount(&server)
        .await;

    let mailer = HttpMailer::new(server.uri(), None, "accounts@greenfield.example".to_string())
        .expect("mailer");
    let app = app_with_mailer(pool, Arc::new(mailer));

    let student = create_student(&app, "ADM-1200", None).await;
    create_fee(&app, student, "2025-04-10").await;

    let auth = format!("Bearer {TEST_CRON_SECRET}");
    let (status, body) = send_with_headers(
        &app,
        Method::POST,
        "/api/emails/send-fee-reminders",
        Some(json!({ "asOf": "2025-05-01" })),
        &[("authorization", auth.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["sent"], 0);
    assert_eq!(body["data"]["failed"], 1);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_dashboard_counts(pool: PgPool) -> sqlx::Result<()> {
    let app = app(pool);
    let student = create_student(&app, "ADM-1300", None).await;
    create_fee(&app, student, "2025-04-10").await;

    let (status, body) = get(&app, "/api/dashboard/stats?date=2025-03-03").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["totalStudents"], 1);
    assert_eq!(body["data"]["activeStudents"], 1);
    assert_eq!(body["data"]["fees"]["pendingCount"], 1);
    assert_eq!(body["data"]["fees"]["pendingAmount"], 1500);

    Ok(())
}
