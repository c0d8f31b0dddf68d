//! CSV export of the student list

use sqlx::PgPool;

use super::list::{StudentFilter, STUDENT_FILTER_SQL};
use crate::features::shared::export::{cell, write_csv, ExportError};
use crate::models::Student;

pub const EXPORT_HEADERS: [&str; 14] = [
    "Admission Number",
    "First Name",
    "Last Name",
    "Email",
    "Phone",
    "Date of Birth",
    "Gender",
    "Class",
    "Section",
    "Roll Number",
    "Parent Name",
    "Parent Phone",
    "Parent Email",
    "Status",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportStudentsError {
    #[error("{0}")]
    Export(#[from] ExportError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub fn student_row(student: &Student) -> Vec<String> {
    vec![
        student.admission_number.clone(),
        student.first_name.clone(),
        student.last_name.clone(),
        cell(student.email.as_deref()),
        cell(student.phone.as_deref()),
        cell(student.date_of_birth),
        cell(student.gender.as_deref()),
        cell(student.class_name.as_deref()),
        cell(student.section.as_deref()),
        cell(student.roll_number.as_deref()),
        cell(student.parent_name.as_deref()),
        cell(student.parent_phone.as_deref()),
        cell(student.parent_email.as_deref()),
        student.status.as_str().to_string(),
    ]
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, filter: StudentFilter) -> Result<Vec<u8>, ExportStudentsError> {
    let sql = format!("SELECT * FROM students {STUDENT_FILTER_SQL} ORDER BY first_name, last_name, id");
    let students = sqlx::query_as::<_, Student>(&sql)
        .bind(filter.search_pattern())
        .bind(filter.class_id)
        .bind(filter.status)
        .fetch_all(&pool)
        .await?;

    tracing::info!(count = students.len(), "Exporting students");

    Ok(write_csv(&EXPORT_HEADERS, students.iter().map(student_row))?)
}
