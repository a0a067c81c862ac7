use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::catalog::filter::{build_listing, Listing, ListingQuery};
use crate::errors::AppError;
use crate::models::resource::ResourceRow;
use crate::models::user::Role;
use crate::resources::repository::{
    create_resource, delete_resource, get_resource, list_resources, update_resource,
    ResourceInput,
};
use crate::state::AppState;

/// GET /api/v1/resources
pub async fn handle_list_resources(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Listing<ResourceRow>>, AppError> {
    // Reject a bad page before loading the whole table.
    query.page_request()?;
    let resources = list_resources(&state.db).await?;
    Ok(Json(build_listing(&resources, &query)?.cloned()))
}

/// GET /api/v1/resources/:id
pub async fn handle_get_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResourceRow>, AppError> {
    get_resource(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resource {id} not found")))
}

/// POST /api/v1/resources
pub async fn handle_create_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ResourceInput>,
) -> Result<(StatusCode, Json<ResourceRow>), AppError> {
    auth.require_role(&[Role::Admin])?;
    input.validate()?;
    input.check_not_blank()?;
    let resource = create_resource(&state.db, auth.id, &input).await?;
    info!("Resource {} created", resource.id);
    Ok((StatusCode::CREATED, Json(resource)))
}

/// PUT /api/v1/resources/:id
pub async fn handle_update_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<ResourceInput>,
) -> Result<Json<ResourceRow>, AppError> {
    auth.require_role(&[Role::Admin])?;
    input.validate()?;
    input.check_not_blank()?;
    let resource = update_resource(&state.db, id, &input).await?;
    info!("Resource {id} updated");
    Ok(Json(resource))
}

/// DELETE /api/v1/resources/:id
pub async fn handle_delete_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require_role(&[Role::Admin])?;
    delete_resource(&state.db, id).await?;
    info!("Resource {id} deleted");
    Ok(StatusCode::NO_CONTENT)
}
