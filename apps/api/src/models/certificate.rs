use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CertificateRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub issuer: String,
    pub issued_on: Option<NaiveDate>,
    pub credential_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
