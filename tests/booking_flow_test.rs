use std::sync::Arc;

use chrono::{Duration, Utc};
use repset::{
    domain::{BookingStatus, CreateAddonRequest, CreateBookingRequest, UpdateAddonRequest},
    error::AppError,
    notifications::NotificationCenter,
    service::ServiceContext,
};
use sqlx::SqlitePool;

async fn context() -> anyhow::Result<Arc<ServiceContext>> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    let notifications = Arc::new(NotificationCenter::new());
    Ok(Arc::new(ServiceContext::new(
        pool,
        notifications,
        "Repset Fitness".to_string(),
    )))
}

fn booking_request(addon_slug: &str, days_ahead: i64) -> CreateBookingRequest {
    CreateBookingRequest {
        addon_slug: addon_slug.to_string(),
        customer_name: "Rohit Shetty".to_string(),
        customer_email: "rohit@example.com".to_string(),
        customer_phone: "9876501234".to_string(),
        preferred_date: Utc::now().date_naive() + Duration::days(days_ahead),
        note: Some("Evening slot preferred".to_string()),
    }
}

#[tokio::test]
async fn test_booking_lifecycle() -> anyhow::Result<()> {
    let ctx = context().await?;

    let addon = ctx
        .addon_service
        .create(CreateAddonRequest {
            name: "Personal Training".to_string(),
            slug: None,
            description: None,
            price: 1500,
            duration_minutes: Some(60),
        })
        .await?;
    assert_eq!(addon.slug, "personal-training");

    let booking = ctx
        .booking_service
        .place(booking_request("personal-training", 3))
        .await?;
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.addon_id, addon.id);

    // Pending -> Confirmed
    let confirmed = ctx.booking_service.confirm(booking.id).await?;
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    // Confirming twice is refused
    let err = ctx.booking_service.confirm(booking.id).await;
    assert!(matches!(err, Err(AppError::Conflict(_))));

    // Confirmed -> Cancelled is allowed
    let cancelled = ctx.booking_service.cancel(booking.id).await?;
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    // Cancelled is terminal
    let err = ctx.booking_service.cancel(booking.id).await;
    assert!(matches!(err, Err(AppError::Conflict(_))));
    let err = ctx.booking_service.confirm(booking.id).await;
    assert!(matches!(err, Err(AppError::Conflict(_))));

    Ok(())
}

#[tokio::test]
async fn test_booking_guards() -> anyhow::Result<()> {
    let ctx = context().await?;

    let addon = ctx
        .addon_service
        .create(CreateAddonRequest {
            name: "Diet Consultation".to_string(),
            slug: None,
            description: None,
            price: 800,
            duration_minutes: Some(45),
        })
        .await?;

    // Unknown add-on
    let err = ctx.booking_service.place(booking_request("swimming", 2)).await;
    assert!(matches!(err, Err(AppError::BadRequest(_))));

    // A date in the past
    let err = ctx
        .booking_service
        .place(booking_request("diet-consultation", -1))
        .await;
    assert!(matches!(err, Err(AppError::BadRequest(_))));

    // Booked add-ons cannot be deleted
    ctx.booking_service
        .place(booking_request("diet-consultation", 2))
        .await?;
    let err = ctx.addon_service.delete(addon.id).await;
    assert!(matches!(err, Err(AppError::Conflict(_))));

    // Deactivated add-ons stop taking bookings
    ctx.addon_service
        .update(
            addon.id,
            UpdateAddonRequest {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;
    let err = ctx
        .booking_service
        .place(booking_request("diet-consultation", 2))
        .await;
    assert!(matches!(err, Err(AppError::BadRequest(_))));

    Ok(())
}
