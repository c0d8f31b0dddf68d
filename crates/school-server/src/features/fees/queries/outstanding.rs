//! Fees a student still owes (Pending or Overdue)

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::FeeRecord;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutstandingFees {
    pub records: Vec<FeeRecord>,
    pub total_outstanding: i64,
}

impl OutstandingFees {
    pub fn from_records(records: Vec<FeeRecord>) -> Self {
        let total_outstanding = records
            .iter()
            .filter(|r| r.status.is_outstanding())
            .map(|r| r.total_amount)
            .sum();
        Self {
            records,
            total_outstanding,
        }
    }
}

/// Unpaid records for one student, earliest due first
pub async fn outstanding_for_student(
    pool: &PgPool,
    student_id: Uuid,
) -> Result<OutstandingFees, sqlx::Error> {
    let records = sqlx::query_as::<_, FeeRecord>(
        r#"
        SELECT * FROM fee_records
        WHERE student_id = $1 AND status IN ('Pending', 'Overdue')
        ORDER BY due_date, created_at
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(OutstandingFees::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeeItem, FeeStatus};
    use chrono::{NaiveDate, Utc};
    use sqlx::types::Json;

    fn record(amount: i64, status: FeeStatus) -> FeeRecord {
        FeeRecord {
            id: Uuid::new_v4(),
            student_id: Uuid::nil(),
            fee_items: Json(vec![FeeItem {
                fee_type: "Tuition".into(),
                amount,
                description: None,
            }]),
            total_amount: amount,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            status,
            paid_at: None,
            remarks: None,
            last_reminded_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_total_outstanding_sums_unpaid_only() {
        let fees = OutstandingFees::from_records(vec![
            record(1000, FeeStatus::Pending),
            record(400, FeeStatus::Overdue),
            record(999, FeeStatus::Paid),
        ]);
        assert_eq!(fees.total_outstanding, 1400);
        assert_eq!(fees.records.len(), 3);
    }
}
