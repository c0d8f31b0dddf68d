//! Router tests that never reach the database
//!
//! These cover request validation, the error envelope, authentication of the
//! cron endpoint and middleware. The pool points at an unreachable address,
//! so any test that accidentally queries the database fails loudly.

use axum::http::{header, Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

mod common;
use common::{assert_error, get, lazy_app, post, put, send_with_headers, TEST_CRON_SECRET};

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = lazy_app();
    let (status, _) = get(&app, "/api/library-books").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let app = lazy_app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn test_malformed_id_uses_error_envelope() {
    let app = lazy_app();
    for uri in [
        "/api/students/not-a-uuid",
        "/api/teachers/42",
        "/api/classes/abc",
        "/api/fees/xyz",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(assert_error(&body), "BAD_REQUEST", "{uri}");
    }
}

// ============================================================================
// Request Validation
// ============================================================================

#[tokio::test]
async fn test_create_student_missing_fields() {
    let app = lazy_app();
    let (status, body) = post(&app, "/api/students", json!({ "firstName": "Aarav" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "BAD_REQUEST");
}

#[tokio::test]
async fn test_create_student_blank_admission_number() {
    let app = lazy_app();
    let (status, body) = post(
        &app,
        "/api/students",
        json!({ "admissionNumber": "  ", "firstName": "Aarav", "lastName": "Sharma" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_teacher_invalid_email() {
    let app = lazy_app();
    let (status, body) = post(
        &app,
        "/api/teachers",
        json!({
            "employeeId": "EMP-9",
            "firstName": "Meera",
            "lastName": "Iyer",
            "email": "meera-at-school",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_teacher_status_must_be_known() {
    let app = lazy_app();
    let (status, body) = put(
        &app,
        &format!("/api/teachers/{}", Uuid::new_v4()),
        json!({ "status": "Retired" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body);
}

#[tokio::test]
async fn test_list_rejects_page_zero() {
    let app = lazy_app();
    let (status, body) = get(&app, "/api/students?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "VALIDATION_ERROR");

    let (status, _) = get(&app, "/api/attendance?perPage=500").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_rejects_page_beyond_limit() {
    let app = lazy_app();
    for uri in [
        "/api/students?page=9223372036854775807",
        "/api/teachers?page=9223372036854775807",
        "/api/classes?page=1000001",
        "/api/fees?page=9223372036854775807",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}: {body}");
        assert_eq!(assert_error(&body), "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_mark_attendance_requires_records() {
    let app = lazy_app();
    let (status, body) = post(
        &app,
        "/api/attendance",
        json!({
            "classId": Uuid::new_v4(),
            "date": Utc::now().date_naive(),
            "markedBy": Uuid::new_v4(),
            "records": [],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_mark_attendance_rejects_future_date() {
    let app = lazy_app();
    let tomorrow = Utc::now().date_naive() + Duration::days(1);
    let (status, body) = post(
        &app,
        "/api/attendance",
        json!({
            "classId": Uuid::new_v4(),
            "date": tomorrow,
            "markedBy": Uuid::new_v4(),
            "records": [{ "studentId": Uuid::new_v4(), "status": "Present" }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_mark_attendance_rejects_duplicate_student() {
    let app = lazy_app();
    let student = Uuid::new_v4();
    let (status, body) = post(
        &app,
        "/api/attendance",
        json!({
            "classId": Uuid::new_v4(),
            "date": "2025-01-06",
            "markedBy": Uuid::new_v4(),
            "records": [
                { "studentId": student, "status": "Present" },
                { "studentId": student, "status": "Absent" },
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_report_rejects_inverted_range() {
    let app = lazy_app();
    let uri = format!(
        "/api/attendance/report?classId={}&startDate=2025-03-31&endDate=2025-03-01",
        Uuid::new_v4()
    );
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_report_rejects_bad_date() {
    let app = lazy_app();
    let uri = format!(
        "/api/attendance/report?classId={}&startDate=2025-02-30",
        Uuid::new_v4()
    );
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_report_rejects_range_over_a_year() {
    let app = lazy_app();
    let uri = format!(
        "/api/attendance/report?classId={}&startDate=2023-01-01&endDate=2025-01-01",
        Uuid::new_v4()
    );
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "VALIDATION_ERROR");
}

// ============================================================================
// Cron Endpoint Authentication
// ============================================================================

#[tokio::test]
async fn test_fee_reminders_require_secret() {
    let app = lazy_app();
    let (status, body) = send_with_headers(
        &app,
        Method::POST,
        "/api/emails/send-fee-reminders",
        None,
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(assert_error(&body), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_fee_reminders_reject_wrong_secret() {
    let app = lazy_app();
    let (status, body) = send_with_headers(
        &app,
        Method::POST,
        "/api/emails/send-fee-reminders",
        None,
        &[("authorization", "Bearer not-the-secret")],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body);
    assert_ne!(TEST_CRON_SECRET, "not-the-secret");
}

#[tokio::test]
async fn test_fee_reminders_reject_malformed_as_of() {
    let app = lazy_app();
    let auth = format!("Bearer {TEST_CRON_SECRET}");
    let (status, body) = send_with_headers(
        &app,
        Method::POST,
        "/api/emails/send-fee-reminders",
        Some(json!({ "asOf": "first of May" })),
        &[("authorization", auth.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(assert_error(&body), "BAD_REQUEST");
}

#[tokio::test]
async fn test_mark_overdue_rejects_malformed_as_of() {
    let app = lazy_app();
    let (status, body) = post(&app, "/api/fees/mark-overdue", json!({ "asOf": 20250501 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(assert_error(&body), "BAD_REQUEST");
}

// ============================================================================
// Middleware
// ============================================================================

#[tokio::test]
async fn test_cors_preflight_for_configured_origin() {
    let app = lazy_app();
    let (status, _) = send_with_headers(
        &app,
        Method::OPTIONS,
        "/api/students",
        None,
        &[
            ("origin", "http://localhost:3000"),
            ("access-control-request-method", "POST"),
        ],
    )
    .await;
    assert!(status.is_success(), "preflight returned {status}");
}

#[tokio::test]
async fn test_cors_allow_origin_header_is_set() {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    let app = lazy_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/students/not-a-uuid")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
}
