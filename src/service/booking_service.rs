use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{Booking, BookingStatus, CreateBookingRequest},
    error::{AppError, Result},
    notifications::{DomainEvent, NotificationCenter},
    repository::{AddonRepository, BookingRepository},
};

pub struct BookingService {
    booking_repo: Arc<dyn BookingRepository>,
    addon_repo: Arc<dyn AddonRepository>,
    notifications: Arc<NotificationCenter>,
}

impl BookingService {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        addon_repo: Arc<dyn AddonRepository>,
        notifications: Arc<NotificationCenter>,
    ) -> Self {
        Self {
            booking_repo,
            addon_repo,
            notifications,
        }
    }

    /// Place a booking for an add-on service from the public site.
    pub async fn place(&self, request: CreateBookingRequest) -> Result<Booking> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let addon = self
            .addon_repo
            .find_by_slug(&request.addon_slug)
            .await?
            .ok_or_else(|| AppError::BadRequest("Unknown add-on service".to_string()))?;

        if !addon.is_active {
            return Err(AppError::BadRequest(
                "This service is not currently bookable".to_string(),
            ));
        }

        if request.preferred_date < Utc::now().date_naive() {
            return Err(AppError::BadRequest(
                "Preferred date is in the past".to_string(),
            ));
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            addon_id: addon.id,
            customer_name: request.customer_name,
            customer_email: request.customer_email,
            customer_phone: request.customer_phone,
            preferred_date: request.preferred_date,
            note: request.note,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let created = self.booking_repo.create(booking).await?;

        self.notifications
            .dispatch(DomainEvent::BookingPlaced(created.clone()))
            .await;

        Ok(created)
    }

    /// Get a booking by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<Booking>> {
        self.booking_repo.find_by_id(id).await
    }

    /// List bookings, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Booking>> {
        self.booking_repo.list(limit, offset).await
    }

    /// List bookings in a given status, soonest preferred date first
    pub async fn list_by_status(&self, status: BookingStatus) -> Result<Vec<Booking>> {
        self.booking_repo.list_by_status(status).await
    }

    /// Confirm a pending booking
    pub async fn confirm(&self, id: Uuid) -> Result<Booking> {
        let booking = self
            .booking_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if !booking.status.can_transition_to(BookingStatus::Confirmed) {
            return Err(AppError::Conflict(format!(
                "Cannot confirm a {} booking",
                booking.status.as_str().to_lowercase()
            )));
        }

        let updated = self
            .booking_repo
            .update_status(id, BookingStatus::Confirmed)
            .await?;

        self.notifications
            .dispatch(DomainEvent::BookingConfirmed(updated.clone()))
            .await;

        Ok(updated)
    }

    /// Cancel a booking
    pub async fn cancel(&self, id: Uuid) -> Result<Booking> {
        let booking = self
            .booking_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if !booking.status.can_transition_to(BookingStatus::Cancelled) {
            return Err(AppError::Conflict(format!(
                "Cannot cancel a {} booking",
                booking.status.as_str().to_lowercase()
            )));
        }

        let updated = self
            .booking_repo
            .update_status(id, BookingStatus::Cancelled)
            .await?;

        self.notifications
            .dispatch(DomainEvent::BookingCancelled(updated.clone()))
            .await;

        Ok(updated)
    }

    /// Delete a booking record
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.booking_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        self.booking_repo.delete(id).await
    }
}
