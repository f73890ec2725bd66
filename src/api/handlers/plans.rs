use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    auth::AuthContext,
    domain::{CreateMembershipPlanRequest, MembershipPlan, UpdateMembershipPlanRequest},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub include_inactive: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<Uuid>,
}

/// Active plans in display order, for the website pricing page.
#[utoipa::path(
    get,
    path = "/public/plans",
    responses(
        (status = 200, description = "Active membership plans in display order", body = [MembershipPlan])
    ),
    tag = "public"
)]
pub async fn list_public(State(state): State<AppState>) -> Result<Json<Vec<MembershipPlan>>> {
    let plans = state.service_context.plan_service.list(false).await?;
    Ok(Json(plans))
}

#[utoipa::path(
    get,
    path = "/public/plans/{slug}",
    params(("slug" = String, Path, description = "Plan slug, e.g. `pro`")),
    responses(
        (status = 200, description = "Plan details", body = MembershipPlan),
        (status = 404, description = "No active plan with this slug")
    ),
    tag = "public"
)]
pub async fn get_public(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MembershipPlan>> {
    let plan = state
        .service_context
        .plan_service
        .get_by_slug(&slug)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::NotFound("Membership plan not found".to_string()))?;
    Ok(Json(plan))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<MembershipPlan>>> {
    let include_inactive = query.include_inactive.unwrap_or(false);
    let plans = state.service_context.plan_service.list(include_inactive).await?;
    Ok(Json(plans))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MembershipPlan>> {
    let plan = state
        .service_context
        .plan_service
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Membership plan not found".to_string()))?;
    Ok(Json(plan))
}

pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MembershipPlan>> {
    let plan = state
        .service_context
        .plan_service
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Membership plan not found".to_string()))?;
    Ok(Json(plan))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Json(request): Json<CreateMembershipPlanRequest>,
) -> Result<(StatusCode, Json<MembershipPlan>)> {
    let created = state.service_context.plan_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMembershipPlanRequest>,
) -> Result<Json<MembershipPlan>> {
    let updated = state.service_context.plan_service.update(id, request).await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.plan_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Json(request): Json<ReorderRequest>,
) -> Result<StatusCode> {
    state.service_context.plan_service.reorder(&request.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn seed(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
) -> Result<Json<Vec<MembershipPlan>>> {
    let plans = state.service_context.plan_service.seed_defaults().await?;
    Ok(Json(plans))
}
