use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::Class;

/// Class joined with its incharge's display name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClassDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub class: Class,
    pub incharge_name: Option<String>,
}

/// Shared `SELECT` for [`ClassDetail`]; callers append `WHERE`/`ORDER BY`
pub(crate) const CLASS_DETAIL_SELECT: &str = r#"
    SELECT c.*, NULLIF(TRIM(CONCAT(t.first_name, ' ', t.last_name)), '') AS incharge_name
    FROM classes c
    LEFT JOIN teachers t ON t.id = c.incharge_id
"#;
