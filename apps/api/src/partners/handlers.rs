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
use crate::models::partner::PartnerRow;
use crate::models::user::Role;
use crate::partners::repository::{
    create_partner, delete_partner, get_partner, list_partners, update_partner, PartnerInput,
};
use crate::state::AppState;

/// GET /api/v1/partners
pub async fn handle_list_partners(
    State(state): State<AppState>,
) -> Result<Json<Vec<PartnerRow>>, AppError> {
    Ok(Json(list_partners(&state.db).await?))
}

/// GET /api/v1/partners/:id
pub async fn handle_get_partner(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PartnerRow>, AppError> {
    get_partner(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Partner {id} not found")))
}

/// POST /api/v1/partners
pub async fn handle_create_partner(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<PartnerInput>,
) -> Result<(StatusCode, Json<PartnerRow>), AppError> {
    auth.require_role(&[Role::Admin])?;
    input.validate()?;
    input.check_not_blank()?;
    let partner = create_partner(&state.db, &input).await?;
    info!("Partner {} created", partner.id);
    Ok((StatusCode::CREATED, Json(partner)))
}

/// PUT /api/v1/partners/:id
pub async fn handle_update_partner(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<PartnerInput>,
) -> Result<Json<PartnerRow>, AppError> {
    auth.require_role(&[Role::Admin])?;
    input.validate()?;
    input.check_not_blank()?;
    Ok(Json(update_partner(&state.db, id, &input).await?))
}

/// DELETE /api/v1/partners/:id
pub async fn handle_delete_partner(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require_role(&[Role::Admin])?;
    delete_partner(&state.db, id).await?;
    info!("Partner {id} deleted");
    Ok(StatusCode::NO_CONTENT)
}
