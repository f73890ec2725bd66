use async_trait::async_trait;

use crate::{
    error::Result,
    notifications::{DomainEvent, NotificationSink},
};

/// Writes every event to the tracing log. Always registered, so a bare
/// deployment still has an audit trail of payments and bookings.
pub struct LogSink {
    enabled: bool,
}

impl LogSink {
    pub fn new() -> Self {
        Self { enabled: true }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn handle_event(&self, event: &DomainEvent) -> Result<()> {
        match event {
            DomainEvent::PaymentRecorded(payment) => {
                tracing::info!(
                    payment_id = %payment.id,
                    customer = %payment.customer_name,
                    plan = %payment.membership_name,
                    amount = payment.final_amount,
                    "Payment recorded"
                );
            }
            DomainEvent::PaymentVerified(payment) => {
                tracing::info!(
                    payment_id = %payment.id,
                    receipt_no = payment.receipt_no.as_deref().unwrap_or("-"),
                    amount = payment.final_amount,
                    "Payment verified"
                );
            }
            DomainEvent::PaymentRejected(payment) => {
                tracing::warn!(
                    payment_id = %payment.id,
                    customer = %payment.customer_name,
                    "Payment rejected"
                );
            }
            DomainEvent::BookingPlaced(booking) => {
                tracing::info!(
                    booking_id = %booking.id,
                    customer = %booking.customer_name,
                    date = %booking.preferred_date,
                    "Booking placed"
                );
            }
            DomainEvent::BookingConfirmed(booking) => {
                tracing::info!(booking_id = %booking.id, "Booking confirmed");
            }
            DomainEvent::BookingCancelled(booking) => {
                tracing::info!(booking_id = %booking.id, "Booking cancelled");
            }
            DomainEvent::MediaUploaded(asset) => {
                tracing::info!(
                    public_id = %asset.public_id,
                    url = %asset.url,
                    "Media uploaded"
                );
            }
        }
        Ok(())
    }
}
