use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use repset::{
    api,
    auth::IdentityVerifier,
    config::Settings,
    notifications::NotificationCenter,
    receipts::ReceiptBuilder,
    service::ServiceContext,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

async fn test_app(settings: &Settings) -> anyhow::Result<(Router, Arc<ServiceContext>)> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    let notifications = Arc::new(NotificationCenter::new());
    let ctx = Arc::new(ServiceContext::new(
        pool,
        notifications,
        settings.receipt.business_name.clone(),
    ));

    let app = api::create_app(
        ctx.clone(),
        None,
        Arc::new(ReceiptBuilder::new(
            settings.upi.clone(),
            settings.receipt.clone(),
        )),
        Arc::new(IdentityVerifier::new(&settings.auth)),
        Arc::new(settings.clone()),
    );

    Ok((app, ctx))
}

fn mint_token(settings: &Settings, admin: bool) -> anyhow::Result<String> {
    let claims = json!({
        "sub": "staff-1",
        "iss": settings.auth.jwt_issuer,
        "email": "staff@repset.fit",
        "name": "Staff",
        "admin": admin,
        "exp": (Utc::now().timestamp() + 3600) as usize,
    });
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.auth.jwt_secret.as_bytes()),
    )?)
}

async fn body_json(response: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn test_health_and_public_catalog() -> anyhow::Result<()> {
    let settings = Settings::default();
    let (app, ctx) = test_app(&settings).await?;
    ctx.plan_service.seed_defaults().await?;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/public/plans").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let plans = body_json(response).await?;
    assert_eq!(plans.as_array().map(|a| a.len()), Some(3));

    // Unknown slug is a 404 with a JSON error body
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/public/plans/steel").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await?;
    assert!(body.get("error").is_some());

    Ok(())
}

#[tokio::test]
async fn test_admin_routes_require_admin_token() -> anyhow::Result<()> {
    let settings = Settings::default();
    let (app, _ctx) = test_app(&settings).await?;

    // No token
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/admin/payments").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Valid token without the admin claim
    let token = mint_token(&settings, false)?;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/payments")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admin token
    let token = mint_token(&settings, true)?;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/payments")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_checkout_over_http() -> anyhow::Result<()> {
    let settings = Settings::default();
    let (app, ctx) = test_app(&settings).await?;
    ctx.plan_service.seed_defaults().await?;

    let payload = json!({
        "plan_slug": "basic",
        "customer_name": "Meera Iyer",
        "customer_email": "meera@example.com",
        "customer_phone": "9898989898"
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/public/payments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&payload)?))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await?;
    assert_eq!(body["payment"]["status"], "Pending");
    assert_eq!(body["amount_display"], "₹1499.00");
    let upi_link = body["upi_link"].as_str().unwrap_or("");
    assert!(upi_link.starts_with("upi://pay?pa="));
    assert!(upi_link.contains("am=1499"));
    let payment_id = body["payment"]["id"].as_str().unwrap_or("").to_string();

    // Status polling re-derives the same deep link
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/public/payments/{}", payment_id))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let status_body = body_json(response).await?;
    assert_eq!(status_body["status"], "Pending");
    assert_eq!(status_body["upi_link"].as_str(), Some(upi_link));
    assert_eq!(status_body["receipt_available"], false);

    // The QR endpoint serves a standalone SVG
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/public/payments/{}/qr", payment_id))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("image/svg+xml")
    );

    // No receipt while the payment is pending
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/public/payments/{}/receipt", payment_id))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Verify through the admin API, then the receipt downloads
    let token = mint_token(&settings, true)?;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/admin/payments/{}/verify", payment_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/public/payments/{}/receipt", payment_id))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/pdf")
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    assert!(bytes.starts_with(b"%PDF"));

    Ok(())
}

#[tokio::test]
async fn test_booking_over_http() -> anyhow::Result<()> {
    let settings = Settings::default();
    let (app, ctx) = test_app(&settings).await?;

    ctx.addon_service
        .create(repset::domain::CreateAddonRequest {
            name: "Physiotherapy Session".to_string(),
            slug: None,
            description: None,
            price: 1200,
            duration_minutes: Some(60),
        })
        .await?;

    let preferred = (Utc::now() + chrono::Duration::days(2)).date_naive();
    let payload = json!({
        "addon_slug": "physiotherapy-session",
        "customer_name": "Kabir Das",
        "customer_email": "kabir@example.com",
        "customer_phone": "9900112233",
        "preferred_date": preferred.to_string()
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/public/bookings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&payload)?))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await?;
    assert_eq!(body["status"], "Pending");
    assert!(body.get("booking_id").is_some());

    Ok(())
}
