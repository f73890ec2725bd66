use std::sync::Arc;

use repset::{
    config::Settings,
    domain::{CreateCouponRequest, PaymentStatus, RecordPaymentRequest},
    error::AppError,
    notifications::{DomainEvent, NotificationCenter},
    receipts::ReceiptBuilder,
    service::ServiceContext,
};
use sqlx::SqlitePool;

async fn context() -> anyhow::Result<(Arc<ServiceContext>, Arc<NotificationCenter>)> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    let notifications = Arc::new(NotificationCenter::new());
    let ctx = Arc::new(ServiceContext::new(
        pool,
        notifications.clone(),
        "Repset Fitness".to_string(),
    ));
    Ok((ctx, notifications))
}

fn checkout_request(plan_slug: &str, coupon_code: Option<&str>) -> RecordPaymentRequest {
    RecordPaymentRequest {
        plan_slug: plan_slug.to_string(),
        customer_name: "Asha Verma".to_string(),
        customer_email: "asha@example.com".to_string(),
        customer_phone: "9812345678".to_string(),
        coupon_code: coupon_code.map(|c| c.to_string()),
        transaction_note: None,
    }
}

#[tokio::test]
async fn test_checkout_flow_with_coupon() -> anyhow::Result<()> {
    let (ctx, notifications) = context().await?;
    let mut events = notifications.subscribe();

    ctx.plan_service.seed_defaults().await?;
    ctx.coupon_service
        .create(CreateCouponRequest {
            code: "SAVE500".to_string(),
            discount: 500,
            valid_until: None,
        })
        .await?;

    // Record: amounts come from the plan and coupon tables
    let payment = ctx
        .payment_service
        .record(checkout_request("pro", Some("SAVE500")))
        .await?;

    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.original_price, 3999);
    assert_eq!(payment.discount_amount, 500);
    assert_eq!(payment.final_amount, 3499);
    assert_eq!(payment.coupon_code.as_deref(), Some("SAVE500"));
    assert_eq!(payment.transaction_note, "Repset Fitness membership: Pro");
    assert!(payment.receipt_no.is_none());

    // Deep link carries the discounted amount and the configured payee
    let settings = Settings::default();
    let receipts = ReceiptBuilder::new(settings.upi.clone(), settings.receipt.clone());
    assert_eq!(
        receipts.deep_link_for(&payment),
        "upi://pay?pa=repsetfitness%40okaxis&pn=Repset%20Fitness&am=3499&cu=INR\
         &tn=Repset%20Fitness%20membership%3A%20Pro"
    );

    // No receipt before verification
    let err = receipts.receipt_pdf_for(&payment).unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Verify: receipt number and payment date are assigned exactly once
    let verified = ctx.payment_service.verify(payment.id).await?;
    assert_eq!(verified.status, PaymentStatus::Verified);
    assert!(verified.receipt_no.as_deref().unwrap_or("").starts_with("RCPT-"));
    assert!(verified.payment_date.is_some());

    let again = ctx.payment_service.verify(payment.id).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    // A verified payment renders a PDF receipt
    let pdf = receipts.receipt_pdf_for(&verified)?;
    assert!(pdf.starts_with(b"%PDF"));

    // Rejecting a verified payment is refused
    let rejected = ctx.payment_service.reject(payment.id).await;
    assert!(matches!(rejected, Err(AppError::Conflict(_))));

    // Both lifecycle events landed on the broadcast feed, in order
    assert!(matches!(events.recv().await?, DomainEvent::PaymentRecorded(_)));
    assert!(matches!(events.recv().await?, DomainEvent::PaymentVerified(_)));

    Ok(())
}

#[tokio::test]
async fn test_record_rejects_bad_inputs() -> anyhow::Result<()> {
    let (ctx, _notifications) = context().await?;
    ctx.plan_service.seed_defaults().await?;

    // Unknown plan
    let err = ctx
        .payment_service
        .record(checkout_request("platinum", None))
        .await;
    assert!(matches!(err, Err(AppError::BadRequest(_))));

    // Unknown coupon
    let err = ctx
        .payment_service
        .record(checkout_request("basic", Some("NOPE")))
        .await;
    assert!(matches!(err, Err(AppError::BadRequest(_))));

    // Coupon larger than the plan price
    ctx.coupon_service
        .create(CreateCouponRequest {
            code: "TOOBIG".to_string(),
            discount: 99_999,
            valid_until: None,
        })
        .await?;
    let err = ctx
        .payment_service
        .record(checkout_request("basic", Some("TOOBIG")))
        .await;
    assert!(matches!(err, Err(AppError::BadRequest(_))));

    // Deactivated plan
    let plans = ctx.plan_service.list(false).await?;
    let basic = plans.iter().find(|p| p.slug == "basic").unwrap();
    ctx.plan_service
        .update(
            basic.id,
            repset::domain::UpdateMembershipPlanRequest {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;
    let err = ctx
        .payment_service
        .record(checkout_request("basic", None))
        .await;
    assert!(matches!(err, Err(AppError::BadRequest(_))));

    Ok(())
}

#[tokio::test]
async fn test_reject_flow() -> anyhow::Result<()> {
    let (ctx, _notifications) = context().await?;
    ctx.plan_service.seed_defaults().await?;

    let payment = ctx
        .payment_service
        .record(checkout_request("basic", None))
        .await?;
    assert_eq!(payment.discount_amount, 0);
    assert_eq!(payment.final_amount, payment.original_price);

    let rejected = ctx.payment_service.reject(payment.id).await?;
    assert_eq!(rejected.status, PaymentStatus::Rejected);
    assert!(rejected.receipt_no.is_none());

    // A rejected payment can no longer be verified
    let err = ctx.payment_service.verify(payment.id).await;
    assert!(matches!(err, Err(AppError::Conflict(_))));

    Ok(())
}
