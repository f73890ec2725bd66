pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    Router,
    routing::{get, post, put, delete},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::IdentityVerifier,
    config::Settings,
    media::MediaUploader,
    receipts::ReceiptBuilder,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    media: Option<Arc<MediaUploader>>,
    receipts: Arc<ReceiptBuilder>,
    identity: Arc<IdentityVerifier>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, media, receipts, identity, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        .route("/api", get(handlers::root::api_info))

        // Interactive docs for the website developers
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", docs::ApiDoc::openapi()))

        // Public routes (for website integration)
        .nest("/public", public_routes())

        // Admin routes
        .nest("/admin", admin_routes(app_state.clone()))

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(handlers::plans::list_public))
        .route("/plans/:slug", get(handlers::plans::get_public))
        .route("/addons", get(handlers::addons::list_public))
        .route("/addons/:slug", get(handlers::addons::get_public))
        .route("/trainers", get(handlers::trainers::list_public))
        .route("/bookings", post(handlers::bookings::create))
        .route("/payments", post(handlers::payments::record))
        .route("/payments/:id", get(handlers::payments::status))
        .route("/payments/:id/qr", get(handlers::payments::qr_svg))
        .route("/payments/:id/receipt", get(handlers::payments::receipt_pdf))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/plans", plan_routes())
        .nest("/addons", addon_routes())
        .nest("/trainers", trainer_routes())
        .nest("/coupons", coupon_routes())
        .nest("/bookings", booking_routes())
        .nest("/payments", payment_routes())
        .nest("/media", media_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_admin,
        ))
        .with_state(state)
}

fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::plans::list))
        .route("/", post(handlers::plans::create))
        .route("/reorder", post(handlers::plans::reorder))
        .route("/seed", post(handlers::plans::seed))
        .route("/slug/:slug", get(handlers::plans::get_by_slug))
        .route("/:id", get(handlers::plans::get))
        .route("/:id", put(handlers::plans::update))
        .route("/:id", delete(handlers::plans::delete))
}

fn addon_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::addons::list))
        .route("/", post(handlers::addons::create))
        .route("/reorder", post(handlers::addons::reorder))
        .route("/slug/:slug", get(handlers::addons::get_by_slug))
        .route("/:id", get(handlers::addons::get))
        .route("/:id", put(handlers::addons::update))
        .route("/:id", delete(handlers::addons::delete))
}

fn trainer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::trainers::list))
        .route("/", post(handlers::trainers::create))
        .route("/reorder", post(handlers::trainers::reorder))
        .route("/:id", get(handlers::trainers::get))
        .route("/:id", put(handlers::trainers::update))
        .route("/:id", delete(handlers::trainers::delete))
}

fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::coupons::list))
        .route("/", post(handlers::coupons::create))
        .route("/:id", get(handlers::coupons::get))
        .route("/:id", put(handlers::coupons::update))
        .route("/:id", delete(handlers::coupons::delete))
}

fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::bookings::list))
        .route("/:id", get(handlers::bookings::get))
        .route("/:id", delete(handlers::bookings::delete))
        .route("/:id/confirm", post(handlers::bookings::confirm))
        .route("/:id/cancel", post(handlers::bookings::cancel))
}

fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::payments::list))
        .route("/:id", get(handlers::payments::get))
        .route("/:id", delete(handlers::payments::delete))
        .route("/:id/verify", post(handlers::payments::verify))
        .route("/:id/reject", post(handlers::payments::reject))
}

fn media_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::media::upload))
        .layer(DefaultBodyLimit::max(handlers::media::UPLOAD_BODY_LIMIT))
}
