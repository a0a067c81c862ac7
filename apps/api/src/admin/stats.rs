use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::application::ApplicationStatus;
use crate::models::user::Role;

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub users_by_role: BTreeMap<String, i64>,
    pub total_jobs: i64,
    pub active_jobs: i64,
    pub applications_by_status: BTreeMap<String, i64>,
    pub total_resources: i64,
    pub total_partners: i64,
}

/// Every known key appears, with zero when the database had no rows for it.
fn count_map(keys: &[&str], rows: Vec<(String, i64)>) -> BTreeMap<String, i64> {
    let mut counts: BTreeMap<String, i64> = keys.iter().map(|k| (k.to_string(), 0)).collect();
    for (key, count) in rows {
        *counts.entry(key).or_insert(0) += count;
    }
    counts
}

pub async fn collect_stats(pool: &PgPool) -> Result<AdminStats, AppError> {
    let roles: Vec<(String, i64)> =
        sqlx::query_as("SELECT role, COUNT(*) FROM users GROUP BY role")
            .fetch_all(pool)
            .await?;

    let (total_jobs, active_jobs): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_active) FROM job_postings",
    )
    .fetch_one(pool)
    .await?;

    let statuses: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM job_applications GROUP BY status")
            .fetch_all(pool)
            .await?;

    let total_resources: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resources")
        .fetch_one(pool)
        .await?;
    let total_partners: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM partners")
        .fetch_one(pool)
        .await?;

    let role_keys: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
    let status_keys: Vec<&str> = ApplicationStatus::ALL.iter().map(|s| s.as_str()).collect();

    Ok(AdminStats {
        users_by_role: count_map(&role_keys, roles),
        total_jobs,
        active_jobs,
        applications_by_status: count_map(&status_keys, statuses),
        total_resources,
        total_partners,
    })
}
