use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ensure_not_blank, AppError};
use crate::models::certificate::CertificateRow;

#[derive(Debug, Deserialize, Validate)]
pub struct CertificateInput {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub issuer: String,
    pub issued_on: Option<NaiveDate>,
    #[validate(url(message = "must be a valid URL"))]
    pub credential_url: Option<String>,
}

impl CertificateInput {
    pub fn check_not_blank(&self) -> Result<(), AppError> {
        ensure_not_blank(&[
            ("title", self.title.as_str()),
            ("issuer", self.issuer.as_str()),
        ])
    }
}

pub async fn list_certificates(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<CertificateRow>, AppError> {
    Ok(sqlx::query_as::<_, CertificateRow>(
        "SELECT * FROM certificates WHERE user_id = $1 ORDER BY issued_on DESC NULLS LAST, created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn count_certificates(pool: &PgPool, user_id: Uuid) -> Result<i64, AppError> {
    Ok(
        sqlx::query_scalar("SELECT COUNT(*) FROM certificates WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?,
    )
}

pub async fn create_certificate(
    pool: &PgPool,
    user_id: Uuid,
    input: &CertificateInput,
) -> Result<CertificateRow, AppError> {
    Ok(sqlx::query_as::<_, CertificateRow>(
        r#"
        INSERT INTO certificates (id, user_id, title, issuer, issued_on, credential_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(input.title.trim())
    .bind(input.issuer.trim())
    .bind(input.issued_on)
    .bind(input.credential_url.as_deref())
    .fetch_one(pool)
    .await?)
}

/// Deletes only when the certificate belongs to `user_id`.
pub async fn delete_certificate(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM certificates WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Certificate {id} not found")));
    }
    Ok(())
}
