use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::catalog::{normalize_list, normalize_tags};
use crate::errors::{ensure_not_blank, AppError};
use crate::models::job::{JobPostingRow, JobType};

/// Editable posting fields; a PUT replaces all of them.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobInput {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub company: String,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub location: String,
    pub job_type: JobType,
    #[serde(default)]
    pub remote: bool,
    #[validate(length(min = 1, max = 10000, message = "must be between 1 and 10000 characters"))]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(length(max = 100))]
    pub salary_range: Option<String>,
    pub deadline: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub partner_id: Option<Uuid>,
}

fn default_active() -> bool {
    true
}

impl JobInput {
    /// Rejects fields that are present but blank after trimming.
    pub fn check_not_blank(&self) -> Result<(), AppError> {
        ensure_not_blank(&[
            ("title", self.title.as_str()),
            ("company", self.company.as_str()),
            ("location", self.location.as_str()),
            ("description", self.description.as_str()),
        ])
    }
}

pub async fn list_active_jobs(pool: &PgPool) -> Result<Vec<JobPostingRow>, AppError> {
    Ok(sqlx::query_as::<_, JobPostingRow>(
        "SELECT * FROM job_postings WHERE is_active ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn list_all_jobs(pool: &PgPool) -> Result<Vec<JobPostingRow>, AppError> {
    Ok(
        sqlx::query_as::<_, JobPostingRow>("SELECT * FROM job_postings ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn list_jobs_by_employer(
    pool: &PgPool,
    employer_id: Uuid,
) -> Result<Vec<JobPostingRow>, AppError> {
    Ok(sqlx::query_as::<_, JobPostingRow>(
        "SELECT * FROM job_postings WHERE employer_id = $1 ORDER BY created_at DESC",
    )
    .bind(employer_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<Option<JobPostingRow>, AppError> {
    Ok(
        sqlx::query_as::<_, JobPostingRow>("SELECT * FROM job_postings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn create_job(
    pool: &PgPool,
    employer_id: Uuid,
    input: &JobInput,
) -> Result<JobPostingRow, AppError> {
    Ok(sqlx::query_as::<_, JobPostingRow>(
        r#"
        INSERT INTO job_postings
            (id, employer_id, partner_id, title, company, location, job_type, remote,
             description, requirements, tags, salary_range, deadline, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(employer_id)
    .bind(input.partner_id)
    .bind(input.title.trim())
    .bind(input.company.trim())
    .bind(input.location.trim())
    .bind(input.job_type.as_str())
    .bind(input.remote)
    .bind(input.description.trim())
    .bind(normalize_list(&input.requirements))
    .bind(normalize_tags(&input.tags))
    .bind(input.salary_range.as_deref())
    .bind(input.deadline)
    .bind(input.is_active)
    .fetch_one(pool)
    .await?)
}

pub async fn update_job(
    pool: &PgPool,
    id: Uuid,
    input: &JobInput,
) -> Result<JobPostingRow, AppError> {
    sqlx::query_as::<_, JobPostingRow>(
        r#"
        UPDATE job_postings SET
            partner_id = $2, title = $3, company = $4, location = $5, job_type = $6,
            remote = $7, description = $8, requirements = $9, tags = $10,
            salary_range = $11, deadline = $12, is_active = $13, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.partner_id)
    .bind(input.title.trim())
    .bind(input.company.trim())
    .bind(input.location.trim())
    .bind(input.job_type.as_str())
    .bind(input.remote)
    .bind(input.description.trim())
    .bind(normalize_list(&input.requirements))
    .bind(normalize_tags(&input.tags))
    .bind(input.salary_range.as_deref())
    .bind(input.deadline)
    .bind(input.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

pub async fn delete_job(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM job_postings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(())
}
