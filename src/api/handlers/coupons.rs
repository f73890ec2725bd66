use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    auth::AuthContext,
    domain::{Coupon, CreateCouponRequest, UpdateCouponRequest},
    error::{AppError, Result},
};

pub async fn list(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
) -> Result<Json<Vec<Coupon>>> {
    let coupons = state.service_context.coupon_service.list().await?;
    Ok(Json(coupons))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Coupon>> {
    let coupon = state
        .service_context
        .coupon_service
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Coupon not found".to_string()))?;
    Ok(Json(coupon))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Json(request): Json<CreateCouponRequest>,
) -> Result<(StatusCode, Json<Coupon>)> {
    let created = state.service_context.coupon_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCouponRequest>,
) -> Result<Json<Coupon>> {
    let updated = state.service_context.coupon_service.update(id, request).await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.coupon_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
