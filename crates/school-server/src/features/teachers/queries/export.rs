//! CSV export of the teacher list

use sqlx::PgPool;

use super::list::{TeacherFilter, TEACHER_FILTER_SQL};
use crate::features::shared::export::{cell, write_csv, ExportError};
use crate::models::Teacher;

pub const EXPORT_HEADERS: [&str; 12] = [
    "Employee ID",
    "First Name",
    "Last Name",
    "Email",
    "Phone",
    "Subjects",
    "Classes",
    "Qualifications",
    "Skills",
    "Joining Date",
    "Salary",
    "Status",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportTeachersError {
    #[error("{0}")]
    Export(#[from] ExportError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// List columns are joined with `; ` so they stay in one cell
pub fn teacher_row(teacher: &Teacher) -> Vec<String> {
    vec![
        teacher.employee_id.clone(),
        teacher.first_name.clone(),
        teacher.last_name.clone(),
        teacher.email.clone(),
        cell(teacher.phone.as_deref()),
        teacher.subjects.join("; "),
        teacher.classes.join("; "),
        teacher.qualifications.join("; "),
        teacher.skills.join("; "),
        cell(teacher.joining_date),
        cell(teacher.salary),
        teacher.status.as_str().to_string(),
    ]
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, filter: TeacherFilter) -> Result<Vec<u8>, ExportTeachersError> {
    let sql = format!("SELECT * FROM teachers {TEACHER_FILTER_SQL} ORDER BY first_name, last_name, id");
    let teachers = sqlx::query_as::<_, Teacher>(&sql)
        .bind(filter.search_pattern())
        .bind(filter.subject())
        .bind(filter.status)
        .fetch_all(&pool)
        .await?;

    tracing::info!(count = teachers.len(), "Exporting teachers");

    Ok(write_csv(&EXPORT_HEADERS, teachers.iter().map(teacher_row))?)
}
