use utoipa::OpenApi;

use crate::api::handlers;
use crate::domain::{
    Addon, BookingStatus, CreateBookingRequest, MediaAsset, MembershipPlan, PaymentRecord,
    PaymentStatus, PlanDuration, RecordPaymentRequest, ResponsiveVariants, Trainer,
};

/// OpenAPI document for the website-facing endpoints. Admin routes are
/// intentionally undocumented here; the management UI is an internal
/// consumer.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Repset API",
        description = "Gym membership plans, trainer profiles, add-on bookings and UPI payments."
    ),
    paths(
        handlers::plans::list_public,
        handlers::plans::get_public,
        handlers::addons::list_public,
        handlers::addons::get_public,
        handlers::trainers::list_public,
        handlers::bookings::create,
        handlers::payments::record,
        handlers::payments::status,
        handlers::payments::qr_svg,
        handlers::payments::receipt_pdf,
    ),
    components(schemas(
        MembershipPlan,
        PlanDuration,
        Addon,
        Trainer,
        CreateBookingRequest,
        BookingStatus,
        RecordPaymentRequest,
        PaymentRecord,
        PaymentStatus,
        MediaAsset,
        ResponsiveVariants,
    )),
    tags(
        (name = "public", description = "Catalog data for the website"),
        (name = "payments", description = "UPI checkout, status polling and receipts")
    )
)]
pub struct ApiDoc;
