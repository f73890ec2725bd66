use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    auth::AuthContext,
    domain::{Booking, BookingStatus, CreateBookingRequest},
    error::{AppError, Result},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingReceivedResponse {
    pub booking_id: Uuid,
    pub status: BookingStatus,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Website booking form submission for an add-on service.
#[utoipa::path(
    post,
    path = "/public/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking recorded, pending confirmation", body = BookingReceivedResponse),
        (status = 400, description = "Unknown add-on, past date or invalid contact details")
    ),
    tag = "public"
)]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingReceivedResponse>)> {
    let booking = state.service_context.booking_service.place(request).await?;

    let response = BookingReceivedResponse {
        booking_id: booking.id,
        status: booking.status,
        message: "Booking received. Our team will confirm your slot shortly.".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<Booking>>> {
    let bookings = match query.status {
        Some(status) => {
            state
                .service_context
                .booking_service
                .list_by_status(status)
                .await?
        }
        None => {
            state
                .service_context
                .booking_service
                .list(query.limit.unwrap_or(50), query.offset.unwrap_or(0))
                .await?
        }
    };
    Ok(Json(bookings))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>> {
    let booking = state
        .service_context
        .booking_service
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    Ok(Json(booking))
}

pub async fn confirm(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>> {
    let booking = state.service_context.booking_service.confirm(id).await?;
    Ok(Json(booking))
}

pub async fn cancel(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>> {
    let booking = state.service_context.booking_service.cancel(id).await?;
    Ok(Json(booking))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.booking_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
