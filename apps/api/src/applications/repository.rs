use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::application::{
    ApplicantRow, ApplicationStatus, ApplicationWithJobRow, JobApplicationRow,
};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ApplicationInput {
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub cover_letter: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

pub async fn create_application(
    pool: &PgPool,
    job_id: Uuid,
    applicant_id: Uuid,
    input: &ApplicationInput,
) -> Result<JobApplicationRow, AppError> {
    Ok(sqlx::query_as::<_, JobApplicationRow>(
        r#"
        INSERT INTO job_applications (id, job_id, applicant_id, cover_letter, resume_url, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(applicant_id)
    .bind(input.cover_letter.as_deref())
    .bind(input.resume_url.as_deref())
    .bind(ApplicationStatus::Pending.as_str())
    .fetch_one(pool)
    .await?)
}

pub async fn get_application(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<JobApplicationRow>, AppError> {
    Ok(
        sqlx::query_as::<_, JobApplicationRow>("SELECT * FROM job_applications WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn list_applications_for_applicant(
    pool: &PgPool,
    applicant_id: Uuid,
) -> Result<Vec<ApplicationWithJobRow>, AppError> {
    Ok(sqlx::query_as::<_, ApplicationWithJobRow>(
        r#"
        SELECT a.id, a.job_id, j.title AS job_title, j.company, a.status,
               a.created_at, a.updated_at
        FROM job_applications a
        JOIN job_postings j ON j.id = a.job_id
        WHERE a.applicant_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(applicant_id)
    .fetch_all(pool)
    .await?)
}

pub async fn list_applicants_for_job(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Vec<ApplicantRow>, AppError> {
    Ok(sqlx::query_as::<_, ApplicantRow>(
        r#"
        SELECT a.id, a.applicant_id, p.full_name AS applicant_name, u.email AS applicant_email,
               a.cover_letter, a.resume_url, a.status, a.created_at
        FROM job_applications a
        JOIN users u ON u.id = a.applicant_id
        JOIN profiles p ON p.id = a.applicant_id
        WHERE a.job_id = $1
        ORDER BY a.created_at ASC
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?)
}

/// Moves an application from `from` to `to`. Returns `None` when the stored
/// status is no longer `from`.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    from: ApplicationStatus,
    to: ApplicationStatus,
) -> Result<Option<JobApplicationRow>, AppError> {
    Ok(sqlx::query_as::<_, JobApplicationRow>(
        r#"
        UPDATE job_applications SET status = $1, updated_at = now()
        WHERE id = $2 AND status = $3
        RETURNING *
        "#,
    )
    .bind(to.as_str())
    .bind(id)
    .bind(from.as_str())
    .fetch_optional(pool)
    .await?)
}

fn decided_statuses() -> Vec<String> {
    ApplicationStatus::ALL
        .iter()
        .filter(|s| s.is_terminal())
        .map(|s| s.as_str().to_string())
        .collect()
}

/// Deletes the applicant's own application unless it has been decided.
/// Returns `false` when no such row exists.
pub async fn withdraw_application(
    pool: &PgPool,
    id: Uuid,
    applicant_id: Uuid,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "DELETE FROM job_applications WHERE id = $1 AND applicant_id = $2 AND status <> ALL($3)",
    )
    .bind(id)
    .bind(applicant_id)
    .bind(decided_statuses())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use crate::test_support::{seed_job, seed_user, test_pool};
    use serde_json::json;
    use ApplicationStatus::*;

    #[test]
    fn test_decided_statuses() {
        let decided = decided_statuses();
        assert_eq!(decided.len(), 2);
        assert!(decided.contains(&"accepted".to_string()));
        assert!(decided.contains(&"rejected".to_string()));
    }

    #[test]
    fn test_application_input_validation() {
        let ok: ApplicationInput = serde_json::from_value(json!({
            "cover_letter": "I built the campus timetable app.",
            "resume_url": "https://files.example.org/cv.pdf"
        }))
        .unwrap();
        assert!(ok.validate().is_ok());

        let bad: ApplicationInput =
            serde_json::from_value(json!({ "resume_url": "my cv" })).unwrap();
        assert!(bad.validate().unwrap_err().field_errors().contains_key("resume_url"));

        let long = ApplicationInput {
            cover_letter: Some("x".repeat(5001)),
            resume_url: None,
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_status_update_parses_known_statuses_only() {
        let update: StatusUpdate = serde_json::from_value(json!({ "status": "shortlisted" })).unwrap();
        assert_eq!(update.status, Shortlisted);
        assert!(serde_json::from_value::<StatusUpdate>(json!({ "status": "hired" })).is_err());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and a disposable Postgres"]
    async fn test_stale_status_update_does_not_overwrite_decision() {
        let Some(pool) = test_pool().await else { return };
        let employer = seed_user(&pool, Role::Employer).await;
        let student = seed_user(&pool, Role::Student).await;
        let job = seed_job(&pool, employer).await;
        let app = create_application(&pool, job.id, student, &ApplicationInput::default())
            .await
            .unwrap();

        // Both reviewers loaded the application while it was pending.
        let accepted = update_status(&pool, app.id, Pending, Accepted).await.unwrap();
        assert_eq!(accepted.unwrap().status, "accepted");
        let late = update_status(&pool, app.id, Pending, Rejected).await.unwrap();
        assert!(late.is_none());

        let stored = get_application(&pool, app.id).await.unwrap().unwrap();
        assert_eq!(stored.status, "accepted");
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and a disposable Postgres"]
    async fn test_concurrent_decisions_only_one_wins() {
        let Some(pool) = test_pool().await else { return };
        let employer = seed_user(&pool, Role::Employer).await;
        let student = seed_user(&pool, Role::Student).await;
        let job = seed_job(&pool, employer).await;
        let app = create_application(&pool, job.id, student, &ApplicationInput::default())
            .await
            .unwrap();

        let (a, b) = tokio::join!(
            update_status(&pool, app.id, Pending, Accepted),
            update_status(&pool, app.id, Pending, Rejected),
        );
        let applied = [a.unwrap(), b.unwrap()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        assert_eq!(applied.len(), 1);

        let stored = get_application(&pool, app.id).await.unwrap().unwrap();
        assert_eq!(stored.status, applied[0].status);
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and a disposable Postgres"]
    async fn test_withdraw_refuses_decided_application() {
        let Some(pool) = test_pool().await else { return };
        let employer = seed_user(&pool, Role::Employer).await;
        let student = seed_user(&pool, Role::Student).await;
        let open_job = seed_job(&pool, employer).await;
        let decided_job = seed_job(&pool, employer).await;

        let open = create_application(&pool, open_job.id, student, &ApplicationInput::default())
            .await
            .unwrap();
        let decided =
            create_application(&pool, decided_job.id, student, &ApplicationInput::default())
                .await
                .unwrap();
        update_status(&pool, decided.id, Pending, Rejected)
            .await
            .unwrap()
            .unwrap();

        assert!(!withdraw_application(&pool, open.id, employer).await.unwrap());
        assert!(withdraw_application(&pool, open.id, student).await.unwrap());
        assert!(!withdraw_application(&pool, open.id, student).await.unwrap());

        assert!(!withdraw_application(&pool, decided.id, student).await.unwrap());
        assert!(get_application(&pool, decided.id).await.unwrap().is_some());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and a disposable Postgres"]
    async fn test_duplicate_application_is_conflict() {
        let Some(pool) = test_pool().await else { return };
        let employer = seed_user(&pool, Role::Employer).await;
        let student = seed_user(&pool, Role::Student).await;
        let job = seed_job(&pool, employer).await;

        create_application(&pool, job.id, student, &ApplicationInput::default())
            .await
            .unwrap();
        let again = create_application(&pool, job.id, student, &ApplicationInput::default()).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }
}
