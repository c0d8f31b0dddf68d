//! HTTP mailer tests against a mock mail service

use chrono::NaiveDate;
use uuid::Uuid;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use school_server::features::reminders::{
    FeeReminder, HttpMailer, MailerError, ReminderMailer,
};
use school_server::models::FeeStatus;

fn reminder() -> FeeReminder {
    FeeReminder {
        fee_record_id: Uuid::new_v4(),
        to: "priya.sharma@mail.example".to_string(),
        parent_name: Some("Priya Sharma".to_string()),
        student_name: "Aarav Sharma".to_string(),
        admission_number: "ADM-42".to_string(),
        amount: 1500,
        due_date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
        status: FeeStatus::Overdue,
        school_name: "Greenfield Public School".to_string(),
    }
}

#[tokio::test]
async fn test_http_mailer_posts_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("authorization", "Bearer secret-key"))
        .and(body_partial_json(serde_json::json!({
            "from": "accounts@greenfield.example",
            "to": "priya.sharma@mail.example",
            "subject": "Greenfield Public School: overdue fee for Aarav Sharma",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mailer = HttpMailer::new(
        format!("{}/v1/messages", server.uri()),
        Some("secret-key".to_string()),
        "accounts@greenfield.example".to_string(),
    )
    .unwrap();

    mailer.send(&reminder()).await.unwrap();
}

#[tokio::test]
async fn test_http_mailer_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid recipient"))
        .mount(&server)
        .await;

    let mailer = HttpMailer::new(server.uri(), None, "accounts@greenfield.example".to_string())
        .unwrap();

    match mailer.send(&reminder()).await {
        Err(MailerError::Rejected { status, body }) => {
            assert_eq!(status, 422);
            assert_eq!(body, "invalid recipient");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn test_reminder_body_mentions_student_and_due_date() {
    let body = reminder().body();
    assert!(body.starts_with("Dear Priya Sharma,"));
    assert!(body.contains("Aarav Sharma (admission no. ADM-42) was due on 10 Apr 2025"));
    assert!(body.ends_with("Greenfield Public School"));
}
