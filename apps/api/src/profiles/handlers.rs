use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::certificate::CertificateRow;
use crate::models::profile::ProfileRow;
use crate::profiles::certificates::{
    count_certificates, create_certificate, delete_certificate, list_certificates,
    CertificateInput,
};
use crate::profiles::completeness::{compute_profile_completeness, CompletenessReport};
use crate::profiles::repository::{get_profile, update_profile, ProfileInput};
use crate::state::AppState;

async fn load_profile(state: &AppState, user_id: Uuid) -> Result<ProfileRow, AppError> {
    get_profile(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {user_id} not found")))
}

/// GET /api/v1/profile
pub async fn handle_get_own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(load_profile(&state, auth.id).await?))
}

/// PUT /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ProfileInput>,
) -> Result<Json<ProfileRow>, AppError> {
    input.validate()?;
    if input.full_name.trim().is_empty() {
        return Err(AppError::Validation("full_name: is required".to_string()));
    }
    let profile = update_profile(&state.db, auth.id, &input).await?;
    info!("Profile {} updated", auth.id);
    Ok(Json(profile))
}

/// GET /api/v1/profile/completeness
pub async fn handle_profile_completeness(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CompletenessReport>, AppError> {
    let profile = load_profile(&state, auth.id).await?;
    let certificates = count_certificates(&state.db, auth.id).await?;
    Ok(Json(compute_profile_completeness(
        &profile,
        auth.role,
        certificates.max(0) as usize,
    )))
}

/// GET /api/v1/profiles/:id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(load_profile(&state, id).await?))
}

/// GET /api/v1/profile/certificates
pub async fn handle_list_certificates(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<CertificateRow>>, AppError> {
    Ok(Json(list_certificates(&state.db, auth.id).await?))
}

/// POST /api/v1/profile/certificates
pub async fn handle_create_certificate(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CertificateInput>,
) -> Result<(StatusCode, Json<CertificateRow>), AppError> {
    input.validate()?;
    input.check_not_blank()?;
    let cert = create_certificate(&state.db, auth.id, &input).await?;
    info!("Certificate {} added for user {}", cert.id, auth.id);
    Ok((StatusCode::CREATED, Json(cert)))
}

/// DELETE /api/v1/profile/certificates/:id
pub async fn handle_delete_certificate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_certificate(&state.db, auth.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
