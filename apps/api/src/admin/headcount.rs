use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::headcount::HeadcountReportRow;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HeadcountInput {
    pub partner_id: Option<Uuid>,
    pub period: String,
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub interns_hosted: i32,
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub graduates_hired: i32,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Reporting periods are calendar quarters written `YYYY-Qn`.
pub fn is_valid_period(period: &str) -> bool {
    let Some((year, quarter)) = period.split_once("-Q") else {
        return false;
    };
    let year_ok = year.len() == 4 && year.parse::<u16>().is_ok_and(|y| y >= 2000);
    let quarter_ok = matches!(quarter, "1" | "2" | "3" | "4");
    year_ok && quarter_ok
}

pub async fn create_report(
    pool: &PgPool,
    reported_by: Uuid,
    input: &HeadcountInput,
) -> Result<HeadcountReportRow, AppError> {
    Ok(sqlx::query_as::<_, HeadcountReportRow>(
        r#"
        INSERT INTO headcount_reports
            (id, partner_id, reported_by, period, interns_hosted, graduates_hired, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(input.partner_id)
    .bind(reported_by)
    .bind(input.period.trim())
    .bind(input.interns_hosted)
    .bind(input.graduates_hired)
    .bind(input.notes.as_deref())
    .fetch_one(pool)
    .await?)
}

pub async fn list_reports(pool: &PgPool) -> Result<Vec<HeadcountReportRow>, AppError> {
    Ok(sqlx::query_as::<_, HeadcountReportRow>(
        "SELECT * FROM headcount_reports ORDER BY period DESC, created_at DESC",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn list_reports_by(
    pool: &PgPool,
    reported_by: Uuid,
) -> Result<Vec<HeadcountReportRow>, AppError> {
    Ok(sqlx::query_as::<_, HeadcountReportRow>(
        "SELECT * FROM headcount_reports WHERE reported_by = $1 ORDER BY period DESC, created_at DESC",
    )
    .bind(reported_by)
    .fetch_all(pool)
    .await?)
}
