use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HeadcountReportRow {
    pub id: Uuid,
    pub partner_id: Option<Uuid>,
    pub reported_by: Uuid,
    pub period: String,
    pub interns_hosted: i32,
    pub graduates_hired: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
