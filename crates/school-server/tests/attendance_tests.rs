//! Attendance marking and reporting against a real database

use axum::http::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

mod common;
use common::{
    app, assert_error, assign_incharge, create_class, create_student, create_teacher, get, post,
    put,
};

async fn mark(
    app: &axum::Router,
    class_id: Uuid,
    teacher_id: Uuid,
    date: &str,
    records: Value,
) -> (StatusCode, Value) {
    post(
        app,
        "/api/attendance",
        json!({
            "classId": class_id,
            "date": date,
            "markedBy": teacher_id,
            "records": records,
        }),
    )
    .await
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_only_active_incharge_can_mark(pool: PgPool) -> sqlx::Result<()> {
    let app = app(pool);
    let class_id = create_class(&app, "Grade 8", "A", 30).await;
    let student = create_student(&app, "ADM-900", Some(class_id)).await;
    let teacher = create_teacher(&app, "EMP-10", "Nisha").await;
    let records = json!([{ "studentId": student, "status": "Present" }]);

    let (status, body) = mark(&app, class_id, teacher, "2025-03-03", records.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(assert_error(&body), "FORBIDDEN");

    assign_incharge(&app, teacher, class_id).await;

    let (status, body) = mark(&app, class_id, teacher, "2025-03-03", records).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["marked"], 1);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_marking_twice_overwrites_same_day(pool: PgPool) -> sqlx::Result<()> {
    let app = app(pool.clone());
    let class_id = create_class(&app, "Grade 8", "B", 30).await;
    let student = create_student(&app, "ADM-901", Some(class_id)).await;
    let teacher = create_teacher(&app, "EMP-11", "Ravi").await;
    assign_incharge(&app, teacher, class_id).await;

    mark(
        &app,
        class_id,
        teacher,
        "2025-03-04",
        json!([{ "studentId": student, "status": "Absent" }]),
    )
    .await;
    let (status, _) = mark(
        &app,
        class_id,
        teacher,
        "2025-03-04",
        json!([{ "studentId": student, "status": "Late", "remarks": "Bus delayed" }]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT status::TEXT FROM attendance WHERE student_id = $1 AND date = '2025-03-04'",
    )
    .bind(student)
    .fetch_all(&pool)
    .await?;
    assert_eq!(rows, vec![("Late".to_string(),)]);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_student_from_other_class_is_rejected(pool: PgPool) -> sqlx::Result<()> {
    let app = app(pool);
    let class_id = create_class(&app, "Grade 10", "A", 30).await;
    let other_class = create_class(&app, "Grade 10", "B", 30).await;
    let outsider = create_student(&app, "ADM-902", Some(other_class)).await;
    let teacher = create_teacher(&app, "EMP-12", "Farah").await;
    assign_incharge(&app, teacher, class_id).await;

    let (status, body) = mark(
        &app,
        class_id,
        teacher,
        "2025-03-05",
        json!([{ "studentId": outsider, "status": "Present" }]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "VALIDATION_ERROR");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_class_report_and_student_summary(pool: PgPool) -> sqlx::Result<()> {
    let app = app(pool);
    let class_id = create_class(&app, "Grade 11", "A", 30).await;
    let first = create_student(&app, "ADM-910", Some(class_id)).await;
    let second = create_student(&app, "ADM-911", Some(class_id)).await;
    let teacher = create_teacher(&app, "EMP-13", "Sunil").await;
    assign_incharge(&app, teacher, class_id).await;

    mark(
        &app,
        class_id,
        teacher,
        "2025-03-10",
        json!([
            { "studentId": first, "status": "Present" },
            { "studentId": second, "status": "Absent" },
        ]),
    )
    .await;
    mark(
        &app,
        class_id,
        teacher,
        "2025-03-11",
        json!([
            { "studentId": first, "status": "Late" },
            { "studentId": second, "status": "Present" },
        ]),
    )
    .await;

    let (status, body) = get(
        &app,
        &format!(
            "/api/attendance/report?classId={class_id}&startDate=2025-03-01&endDate=2025-03-31"
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let report = &body["data"];
    assert_eq!(report["range"]["start"], "2025-03-01");
    assert_eq!(report["byDate"].as_array().map(Vec::len), Some(2));
    assert_eq!(report["summary"]["present"], 2);
    assert_eq!(report["summary"]["late"], 1);
    assert_eq!(report["summary"]["absent"], 1);
    assert_eq!(report["summary"]["attendanceRate"], 75.0);
    assert_eq!(report["summary"]["daysRecorded"], 2);

    let (status, body) = get(
        &app,
        &format!("/api/attendance/students/{first}/summary?startDate=2025-03-01&endDate=2025-03-31"),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["attendanceRate"], 100.0);

    let (status, body) = get(
        &app,
        &format!("/api/attendance?classId={class_id}&date=2025-03-10"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["pagination"]["total"], 2);
    assert_eq!(body["data"][0]["className"], "Grade 11");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "Requires database"]
async fn test_correcting_a_single_record(pool: PgPool) -> sqlx::Result<()> {
    let app = app(pool);
    let class_id = create_class(&app, "Grade 12", "A", 30).await;
    let student = create_student(&app, "ADM-920", Some(class_id)).await;
    let teacher = create_teacher(&app, "EMP-14", "Gita").await;
    assign_incharge(&app, teacher, class_id).await;

    let (_, body) = mark(
        &app,
        class_id,
        teacher,
        "2025-03-12",
        json!([{ "studentId": student, "status": "Absent" }]),
    )
    .await;
    let record_id = body["data"]["records"][0]["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = put(
        &app,
        &format!("/api/attendance/{record_id}"),
        json!({ "status": "Present" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "Present");

    let (status, _) = put(&app, &format!("/api/attendance/{record_id}"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}
