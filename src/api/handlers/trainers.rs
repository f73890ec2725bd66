use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    auth::AuthContext,
    domain::{CreateTrainerRequest, Trainer, UpdateTrainerRequest},
    error::{AppError, Result},
};

use super::plans::{ListQuery, ReorderRequest};

/// Active trainer profiles for the website team page.
#[utoipa::path(
    get,
    path = "/public/trainers",
    responses(
        (status = 200, description = "Active trainer profiles in display order", body = [Trainer])
    ),
    tag = "public"
)]
pub async fn list_public(State(state): State<AppState>) -> Result<Json<Vec<Trainer>>> {
    let trainers = state.service_context.trainer_service.list(false).await?;
    Ok(Json(trainers))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Trainer>>> {
    let include_inactive = query.include_inactive.unwrap_or(false);
    let trainers = state
        .service_context
        .trainer_service
        .list(include_inactive)
        .await?;
    Ok(Json(trainers))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Trainer>> {
    let trainer = state
        .service_context
        .trainer_service
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Trainer not found".to_string()))?;
    Ok(Json(trainer))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Json(request): Json<CreateTrainerRequest>,
) -> Result<(StatusCode, Json<Trainer>)> {
    let created = state.service_context.trainer_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTrainerRequest>,
) -> Result<Json<Trainer>> {
    let updated = state
        .service_context
        .trainer_service
        .update(id, request)
        .await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.trainer_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Json(request): Json<ReorderRequest>,
) -> Result<StatusCode> {
    state
        .service_context
        .trainer_service
        .reorder(&request.ids)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
