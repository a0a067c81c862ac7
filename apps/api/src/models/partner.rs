use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::text_enum;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PartnerType {
    Employer,
    University,
    Ngo,
    Government,
}

text_enum!(PartnerType {
    Employer => "employer",
    University => "university",
    Ngo => "ngo",
    Government => "government",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PartnerRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub partner_type: String,
    pub created_at: DateTime<Utc>,
}
