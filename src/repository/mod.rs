use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod addon_repository;
pub mod booking_repository;
pub mod coupon_repository;
pub mod payment_repository;
pub mod plan_repository;
pub mod trainer_repository;

pub use addon_repository::{AddonRepository, SqliteAddonRepository};
pub use booking_repository::SqliteBookingRepository;
pub use coupon_repository::{CouponRepository, SqliteCouponRepository};
pub use payment_repository::SqlitePaymentRepository;
pub use plan_repository::{MembershipPlanRepository, SqliteMembershipPlanRepository};
pub use trainer_repository::{SqliteTrainerRepository, TrainerRepository};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: Booking) -> Result<Booking>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Booking>>;
    async fn list_by_status(&self, status: BookingStatus) -> Result<Vec<Booking>>;
    async fn list_for_addon(&self, addon_id: Uuid) -> Result<Vec<Booking>>;
    async fn update_status(&self, id: Uuid, status: BookingStatus) -> Result<Booking>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: PaymentRecord) -> Result<PaymentRecord>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentRecord>>;
    async fn find_by_receipt_no(&self, receipt_no: &str) -> Result<Option<PaymentRecord>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<PaymentRecord>>;
    async fn list_by_status(&self, status: PaymentStatus) -> Result<Vec<PaymentRecord>>;
    async fn verify(&self, id: Uuid, receipt_no: &str) -> Result<PaymentRecord>;
    async fn update_status(&self, id: Uuid, status: PaymentStatus) -> Result<PaymentRecord>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}
