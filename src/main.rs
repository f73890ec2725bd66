mod api;
mod auth;
mod config;
mod domain;
mod error;
mod media;
mod notifications;
mod receipts;
mod repository;
mod service;

use std::sync::Arc;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    auth::IdentityVerifier,
    config::Settings,
    media::MediaUploader,
    notifications::{LogSink, NotificationCenter},
    receipts::ReceiptBuilder,
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repset=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!("Starting Repset server on {}:{}", settings.server.host, settings.server.port);

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    // Initialize notification center
    let notifications = Arc::new(NotificationCenter::new());
    notifications.register(Arc::new(LogSink::new())).await;

    // Create service context
    let service_context = Arc::new(ServiceContext::new(
        db_pool.clone(),
        notifications,
        settings.receipt.business_name.clone(),
    ));

    // Initialize the media uploader if configured
    let media_uploader = match MediaUploader::from_config(&settings.media) {
        Some(uploader) => {
            tracing::info!("Media uploads enabled");
            Some(Arc::new(uploader))
        }
        None => {
            tracing::info!("Media uploads disabled");
            None
        }
    };

    let receipts = Arc::new(ReceiptBuilder::new(
        settings.upi.clone(),
        settings.receipt.clone(),
    ));

    let identity = Arc::new(IdentityVerifier::new(&settings.auth));

    let app = api::create_app(
        service_context,
        media_uploader,
        receipts,
        identity,
        Arc::new(settings.clone()),
    );

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on http://{}:{}", settings.server.host, settings.server.port);

    axum::serve(listener, app).await?;

    Ok(())
}
