use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::applications::repository::{
    create_application, get_application, list_applicants_for_job,
    list_applications_for_applicant, update_status, withdraw_application, ApplicationInput,
    StatusUpdate,
};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::jobs::handlers::{ensure_can_manage, load_job};
use crate::models::application::{
    ApplicantRow, ApplicationStatus, ApplicationWithJobRow, JobApplicationRow,
};
use crate::models::job::JobPostingRow;
use crate::models::user::Role;
use crate::state::AppState;

fn stored_status(row: &JobApplicationRow) -> Result<ApplicationStatus, AppError> {
    ApplicationStatus::parse(&row.status).ok_or_else(|| {
        AppError::Internal(anyhow!(
            "application {} has unknown status '{}'",
            row.id,
            row.status
        ))
    })
}

/// Inactive postings are reported as missing, matching the public detail view.
fn ensure_open_for_applications(job: &JobPostingRow, today: NaiveDate) -> Result<(), AppError> {
    if !job.is_active {
        return Err(AppError::NotFound(format!("Job {} not found", job.id)));
    }
    if !job.accepts_applications(today) {
        return Err(AppError::UnprocessableEntity(format!(
            "Job {} is not accepting applications",
            job.id
        )));
    }
    Ok(())
}

/// `Ok(None)` means the application already holds `requested`.
fn plan_status_change(
    current: ApplicationStatus,
    requested: ApplicationStatus,
) -> Result<Option<ApplicationStatus>, AppError> {
    if current == requested {
        return Ok(None);
    }
    if !current.can_transition_to(requested) {
        return Err(AppError::UnprocessableEntity(format!(
            "Cannot move application from {current} to {requested}"
        )));
    }
    Ok(Some(requested))
}

async fn load_application(state: &AppState, id: Uuid) -> Result<JobApplicationRow, AppError> {
    get_application(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// POST /api/v1/jobs/:id/applications
pub async fn handle_apply(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<Uuid>,
    Json(input): Json<ApplicationInput>,
) -> Result<(StatusCode, Json<JobApplicationRow>), AppError> {
    auth.require_role(&[Role::Student])?;
    input.validate()?;

    let job = load_job(&state, job_id).await?;
    ensure_open_for_applications(&job, Utc::now().date_naive())?;

    let application = create_application(&state.db, job_id, auth.id, &input)
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("You have already applied to job {job_id}"))
            }
            other => other,
        })?;

    info!("Application {} submitted for job {job_id}", application.id);
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications/mine
pub async fn handle_my_applications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ApplicationWithJobRow>>, AppError> {
    auth.require_role(&[Role::Student])?;
    Ok(Json(
        list_applications_for_applicant(&state.db, auth.id).await?,
    ))
}

/// GET /api/v1/jobs/:id/applications
pub async fn handle_job_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicantRow>>, AppError> {
    let job = load_job(&state, job_id).await?;
    ensure_can_manage(&auth, &job)?;
    Ok(Json(list_applicants_for_job(&state.db, job_id).await?))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<JobApplicationRow>, AppError> {
    let application = load_application(&state, id).await?;
    let job = load_job(&state, application.job_id).await?;
    ensure_can_manage(&auth, &job)?;

    let current = stored_status(&application)?;
    let Some(next) = plan_status_change(current, req.status)? else {
        return Ok(Json(application));
    };

    let updated = update_status(&state.db, id, current, next)
        .await?
        .ok_or_else(|| {
            AppError::UnprocessableEntity(format!(
                "Application {id} changed while it was being updated; reload and retry"
            ))
        })?;
    info!("Application {id} moved from {current} to {next}");
    Ok(Json(updated))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_withdraw(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let application = load_application(&state, id).await?;
    if application.applicant_id != auth.id {
        return Err(AppError::Forbidden);
    }
    let current = stored_status(&application)?;
    if current.is_terminal() {
        return Err(AppError::UnprocessableEntity(format!(
            "Application {id} was already {current}"
        )));
    }

    if !withdraw_application(&state.db, id, auth.id).await? {
        return Err(AppError::UnprocessableEntity(format!(
            "Application {id} was decided before it could be withdrawn"
        )));
    }
    info!("Application {id} withdrawn");
    Ok(StatusCode::NO_CONTENT)
}
