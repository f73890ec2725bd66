use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    auth::AuthContext,
    domain::{Addon, CreateAddonRequest, UpdateAddonRequest},
    error::{AppError, Result},
};

use super::plans::{ListQuery, ReorderRequest};

/// Active add-on services (personal training, diet plans, ...) for the
/// website services page.
#[utoipa::path(
    get,
    path = "/public/addons",
    responses(
        (status = 200, description = "Active add-on services in display order", body = [Addon])
    ),
    tag = "public"
)]
pub async fn list_public(State(state): State<AppState>) -> Result<Json<Vec<Addon>>> {
    let addons = state.service_context.addon_service.list(false).await?;
    Ok(Json(addons))
}

#[utoipa::path(
    get,
    path = "/public/addons/{slug}",
    params(("slug" = String, Path, description = "Add-on slug, e.g. `personal-training`")),
    responses(
        (status = 200, description = "Add-on details", body = Addon),
        (status = 404, description = "No active add-on with this slug")
    ),
    tag = "public"
)]
pub async fn get_public(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Addon>> {
    let addon = state
        .service_context
        .addon_service
        .get_by_slug(&slug)
        .await?
        .filter(|a| a.is_active)
        .ok_or_else(|| AppError::NotFound("Add-on service not found".to_string()))?;
    Ok(Json(addon))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Addon>>> {
    let include_inactive = query.include_inactive.unwrap_or(false);
    let addons = state.service_context.addon_service.list(include_inactive).await?;
    Ok(Json(addons))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Addon>> {
    let addon = state
        .service_context
        .addon_service
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Add-on service not found".to_string()))?;
    Ok(Json(addon))
}

pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Addon>> {
    let addon = state
        .service_context
        .addon_service
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Add-on service not found".to_string()))?;
    Ok(Json(addon))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Json(request): Json<CreateAddonRequest>,
) -> Result<(StatusCode, Json<Addon>)> {
    let created = state.service_context.addon_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAddonRequest>,
) -> Result<Json<Addon>> {
    let updated = state.service_context.addon_service.update(id, request).await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.addon_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Json(request): Json<ReorderRequest>,
) -> Result<StatusCode> {
    state.service_context.addon_service.reorder(&request.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}
