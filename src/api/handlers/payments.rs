use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    auth::AuthContext,
    domain::{format_inr, PaymentRecord, PaymentStatus, RecordPaymentRequest},
    error::{AppError, Result},
};

// =============================================================================
// Response Types
// =============================================================================

/// Everything the checkout page needs to show the "scan and pay" step.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentInstructionsResponse {
    pub payment: PaymentRecord,
    /// `upi://pay?...` deep link for payment apps on the same device.
    pub upi_link: String,
    /// Inline `data:image/svg+xml;base64,...` QR code for cross-device scans.
    pub qr_data_uri: String,
    pub amount_display: String,
}

/// Trimmed status view for polling from the checkout page. Carries the
/// deep link again so a refreshed page can restore the pay button.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentStatusResponse {
    pub id: Uuid,
    pub status: PaymentStatus,
    pub amount_display: String,
    pub upi_link: String,
    pub receipt_available: bool,
}

#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub status: Option<PaymentStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// =============================================================================
// Public Endpoints
// =============================================================================

/// Records a pending payment and returns the UPI payment instructions.
#[utoipa::path(
    post,
    path = "/public/payments",
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded, UPI instructions returned", body = PaymentInstructionsResponse),
        (status = 400, description = "Unknown plan, invalid coupon or invalid contact details")
    ),
    tag = "payments"
)]
pub async fn record(
    State(state): State<AppState>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<PaymentInstructionsResponse>)> {
    let payment = state.service_context.payment_service.record(request).await?;

    let upi_link = state.receipts.deep_link_for(&payment);
    let qr_data_uri = state.receipts.qr_data_uri_for(&payment)?;
    let amount_display = format_inr(payment.final_amount);

    let response = PaymentInstructionsResponse {
        payment,
        upi_link,
        qr_data_uri,
        amount_display,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/public/payments/{id}",
    params(("id" = Uuid, Path, description = "Payment id returned at record time")),
    responses(
        (status = 200, description = "Current payment status", body = PaymentStatusResponse),
        (status = 404, description = "Unknown payment")
    ),
    tag = "payments"
)]
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentStatusResponse>> {
    let payment = find_payment(&state, id).await?;

    Ok(Json(PaymentStatusResponse {
        id: payment.id,
        status: payment.status,
        amount_display: format_inr(payment.final_amount),
        upi_link: state.receipts.deep_link_for(&payment),
        receipt_available: payment.status == PaymentStatus::Verified,
    }))
}

/// QR code for the payment's UPI deep link, as a standalone SVG image.
#[utoipa::path(
    get,
    path = "/public/payments/{id}/qr",
    params(("id" = Uuid, Path, description = "Payment id returned at record time")),
    responses(
        (status = 200, description = "QR code", content_type = "image/svg+xml"),
        (status = 404, description = "Unknown payment")
    ),
    tag = "payments"
)]
pub async fn qr_svg(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let payment = find_payment(&state, id).await?;
    let svg = state.receipts.qr_svg_for(&payment)?;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

/// Receipt PDF download. Only available once the payment is verified.
#[utoipa::path(
    get,
    path = "/public/payments/{id}/receipt",
    params(("id" = Uuid, Path, description = "Payment id returned at record time")),
    responses(
        (status = 200, description = "Receipt PDF", content_type = "application/pdf"),
        (status = 404, description = "Unknown payment"),
        (status = 409, description = "Payment not verified yet")
    ),
    tag = "payments"
)]
pub async fn receipt_pdf(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let payment = find_payment(&state, id).await?;

    if payment.status != PaymentStatus::Verified {
        return Err(AppError::Conflict(
            "Receipt is available only for verified payments".to_string(),
        ));
    }

    let pdf = state.receipts.receipt_pdf_for(&payment)?;
    let disposition = format!(
        "attachment; filename=\"{}.pdf\"",
        payment.receipt_no.as_deref().unwrap_or("receipt")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}

// =============================================================================
// Admin Endpoints
// =============================================================================

pub async fn list(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Query(query): Query<PaymentListQuery>,
) -> Result<Json<Vec<PaymentRecord>>> {
    let payments = match query.status {
        Some(status) => {
            state
                .service_context
                .payment_service
                .list_by_status(status)
                .await?
        }
        None => {
            state
                .service_context
                .payment_service
                .list(query.limit.unwrap_or(50), query.offset.unwrap_or(0))
                .await?
        }
    };
    Ok(Json(payments))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentRecord>> {
    let payment = find_payment(&state, id).await?;
    Ok(Json(payment))
}

pub async fn verify(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentRecord>> {
    let payment = state.service_context.payment_service.verify(id).await?;
    Ok(Json(payment))
}

pub async fn reject(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentRecord>> {
    let payment = state.service_context.payment_service.reject(id).await?;
    Ok(Json(payment))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.payment_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn find_payment(state: &AppState, id: Uuid) -> Result<PaymentRecord> {
    state
        .service_context
        .payment_service
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
}
