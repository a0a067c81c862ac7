use std::cmp::Reverse;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::catalog::filter::{build_listing, Listing, ListingQuery};
use crate::errors::AppError;
use crate::jobs::repository::{
    create_job, delete_job, get_job, list_active_jobs, list_all_jobs, list_jobs_by_employer,
    update_job, JobInput,
};
use crate::matching::MatchReport;
use crate::models::job::JobPostingRow;
use crate::models::user::Role;
use crate::profiles::repository::get_profile;
use crate::state::AppState;

const DEFAULT_RECOMMENDATIONS: usize = 10;
const MAX_RECOMMENDATIONS: usize = 50;

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendedJob {
    pub job: JobPostingRow,
    pub match_report: MatchReport,
}

/// Owners manage their own postings; admins manage all of them.
pub fn ensure_can_manage(auth: &AuthUser, job: &JobPostingRow) -> Result<(), AppError> {
    if auth.is_admin() || job.is_owned_by(auth.id) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub async fn load_job(state: &AppState, id: Uuid) -> Result<JobPostingRow, AppError> {
    get_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Listing<JobPostingRow>>, AppError> {
    // Reject a bad page before loading the whole table.
    query.page_request()?;
    let jobs = list_active_jobs(&state.db).await?;
    let listing = build_listing(&jobs, &query)?.cloned();
    Ok(Json(listing))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobPostingRow>, AppError> {
    let job = load_job(&state, id).await?;
    if !job.is_active {
        let visible = auth
            .as_ref()
            .is_some_and(|a| ensure_can_manage(a, &job).is_ok());
        if !visible {
            return Err(AppError::NotFound(format!("Job {id} not found")));
        }
    }
    Ok(Json(job))
}

/// GET /api/v1/jobs/mine
pub async fn handle_my_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<JobPostingRow>>, AppError> {
    auth.require_role(&[Role::Employer, Role::Admin])?;
    let jobs = if auth.is_admin() {
        list_all_jobs(&state.db).await?
    } else {
        list_jobs_by_employer(&state.db, auth.id).await?
    };
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/recommended
pub async fn handle_recommended_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<Vec<RecommendedJob>>, AppError> {
    auth.require_role(&[Role::Student])?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECOMMENDATIONS)
        .clamp(1, MAX_RECOMMENDATIONS);

    let profile = get_profile(&state.db, auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", auth.id)))?;

    let today = Utc::now().date_naive();
    let mut ranked = Vec::new();
    for job in list_active_jobs(&state.db).await? {
        if !job.accepts_applications(today) {
            continue;
        }
        let match_report = state.match_scorer.score(&profile, &job).await?;
        ranked.push(RecommendedJob { job, match_report });
    }

    // jobs arrive newest first; the stable sort keeps that order within a score
    ranked.sort_by_key(|r| Reverse(r.match_report.overall_score));
    ranked.truncate(limit);
    Ok(Json(ranked))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<JobInput>,
) -> Result<(StatusCode, Json<JobPostingRow>), AppError> {
    auth.require_role(&[Role::Employer, Role::Admin])?;
    input.validate()?;
    input.check_not_blank()?;

    let job = create_job(&state.db, auth.id, &input).await?;
    info!("Job {} created by {}", job.id, auth.id);
    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<JobInput>,
) -> Result<Json<JobPostingRow>, AppError> {
    let existing = load_job(&state, id).await?;
    ensure_can_manage(&auth, &existing)?;
    input.validate()?;
    input.check_not_blank()?;

    let job = update_job(&state.db, id, &input).await?;
    info!("Job {id} updated by {}", auth.id);
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = load_job(&state, id).await?;
    ensure_can_manage(&auth, &existing)?;

    delete_job(&state.db, id).await?;
    info!("Job {id} deleted by {}", auth.id);
    Ok(StatusCode::NO_CONTENT)
}
