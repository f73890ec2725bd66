use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::domain::{Booking, MediaAsset, PaymentRecord};
use crate::error::Result;

pub mod log_sink;

pub use log_sink::LogSink;

/// Events emitted by the service layer after a state change has been
/// persisted. Every dispatch also lands on the broadcast feed, so
/// in-process consumers can follow changes live without polling.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    PaymentRecorded(PaymentRecord),
    PaymentVerified(PaymentRecord),
    PaymentRejected(PaymentRecord),
    BookingPlaced(Booking),
    BookingConfirmed(Booking),
    BookingCancelled(Booking),
    MediaUploaded(MediaAsset),
}

impl DomainEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::PaymentRecorded(_) => "payment_recorded",
            DomainEvent::PaymentVerified(_) => "payment_verified",
            DomainEvent::PaymentRejected(_) => "payment_rejected",
            DomainEvent::BookingPlaced(_) => "booking_placed",
            DomainEvent::BookingConfirmed(_) => "booking_confirmed",
            DomainEvent::BookingCancelled(_) => "booking_cancelled",
            DomainEvent::MediaUploaded(_) => "media_uploaded",
        }
    }
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;
    fn is_enabled(&self) -> bool;
    async fn handle_event(&self, event: &DomainEvent) -> Result<()>;
}

pub struct NotificationCenter {
    sinks: RwLock<Vec<Arc<dyn NotificationSink>>>,
    feed: broadcast::Sender<DomainEvent>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (feed, _) = broadcast::channel(128);
        Self {
            sinks: RwLock::new(Vec::new()),
            feed,
        }
    }

    pub async fn register(&self, sink: Arc<dyn NotificationSink>) {
        if sink.is_enabled() {
            let mut sinks = self.sinks.write().await;
            sinks.push(sink);
            tracing::info!("Registered notification sink: {}", sinks.last().unwrap().name());
        }
    }

    /// Live feed of dispatched events. Receivers that fall behind drop
    /// the oldest entries, never block the dispatcher.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.feed.subscribe()
    }

    pub async fn dispatch(&self, event: DomainEvent) {
        // A send error just means nobody is listening right now.
        let _ = self.feed.send(event.clone());

        let sinks = self.sinks.read().await;

        for sink in sinks.iter() {
            if !sink.is_enabled() {
                continue;
            }

            match sink.handle_event(&event).await {
                Ok(_) => {
                    tracing::debug!(
                        "Sink {} handled {} event",
                        sink.name(),
                        event.kind()
                    );
                }
                Err(e) => {
                    tracing::error!(
                        "Sink {} failed to handle {} event: {:?}",
                        sink.name(),
                        event.kind(),
                        e
                    );
                    // Continue processing other sinks even if one fails
                }
            }
        }
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}
