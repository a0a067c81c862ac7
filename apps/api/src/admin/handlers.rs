use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::admin::headcount::{
    create_report, is_valid_period, list_reports, list_reports_by, HeadcountInput,
};
use crate::admin::stats::{collect_stats, AdminStats};
use crate::auth::users::{list_users, update_role};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::headcount::HeadcountReportRow;
use crate::models::user::{Role, User};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

/// GET /api/v1/admin/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<AdminStats>, AppError> {
    auth.require_role(&[Role::Admin])?;
    Ok(Json(collect_stats(&state.db).await?))
}

/// GET /api/v1/admin/users
pub async fn handle_list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<User>>, AppError> {
    auth.require_role(&[Role::Admin])?;
    Ok(Json(list_users(&state.db).await?))
}

/// PATCH /api/v1/admin/users/:id/role
pub async fn handle_change_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RoleChange>,
) -> Result<Json<User>, AppError> {
    auth.require_role(&[Role::Admin])?;
    if id == auth.id && req.role != Role::Admin {
        return Err(AppError::UnprocessableEntity(
            "Admins cannot remove their own admin role".to_string(),
        ));
    }
    let user = update_role(&state.db, id, req.role).await?;
    info!("User {id} role set to {} by {}", req.role, auth.id);
    Ok(Json(user))
}

/// POST /api/v1/headcount-reports
pub async fn handle_create_headcount(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<HeadcountInput>,
) -> Result<(StatusCode, Json<HeadcountReportRow>), AppError> {
    auth.require_role(&[Role::Employer, Role::Admin])?;
    input.validate()?;
    if !is_valid_period(input.period.trim()) {
        return Err(AppError::Validation(
            "period: must look like 2026-Q1".to_string(),
        ));
    }
    let report = create_report(&state.db, auth.id, &input).await?;
    info!("Headcount report {} filed for {}", report.id, report.period);
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /api/v1/headcount-reports
pub async fn handle_list_headcount(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<HeadcountReportRow>>, AppError> {
    auth.require_role(&[Role::Employer, Role::Admin])?;
    let reports = if auth.is_admin() {
        list_reports(&state.db).await?
    } else {
        list_reports_by(&state.db, auth.id).await?
    };
    Ok(Json(reports))
}
