pub mod addon_service;
pub mod booking_service;
pub mod coupon_service;
pub mod payment_service;
pub mod plan_service;
pub mod trainer_service;

use std::sync::Arc;
use sqlx::SqlitePool;

use crate::notifications::NotificationCenter;
use crate::repository::*;

pub use addon_service::AddonService;
pub use booking_service::BookingService;
pub use coupon_service::{AppliedCoupon, CouponService};
pub use payment_service::PaymentService;
pub use plan_service::PlanService;
pub use trainer_service::TrainerService;

pub struct ServiceContext {
    pub plan_service: Arc<PlanService>,
    pub addon_service: Arc<AddonService>,
    pub trainer_service: Arc<TrainerService>,
    pub booking_service: Arc<BookingService>,
    pub coupon_service: Arc<CouponService>,
    pub payment_service: Arc<PaymentService>,
    pub notifications: Arc<NotificationCenter>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        db_pool: SqlitePool,
        notifications: Arc<NotificationCenter>,
        business_name: String,
    ) -> Self {
        // Repositories
        let plan_repo = Arc::new(SqliteMembershipPlanRepository::new(db_pool.clone()));
        let addon_repo = Arc::new(SqliteAddonRepository::new(db_pool.clone()));
        let trainer_repo = Arc::new(SqliteTrainerRepository::new(db_pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepository::new(db_pool.clone()));
        let coupon_repo = Arc::new(SqliteCouponRepository::new(db_pool.clone()));
        let payment_repo = Arc::new(SqlitePaymentRepository::new(db_pool.clone()));

        // Services
        let plan_service = Arc::new(PlanService::new(plan_repo.clone()));
        let addon_service = Arc::new(AddonService::new(addon_repo.clone()));
        let trainer_service = Arc::new(TrainerService::new(trainer_repo));
        let coupon_service = Arc::new(CouponService::new(coupon_repo));
        let booking_service = Arc::new(BookingService::new(
            booking_repo,
            addon_repo,
            notifications.clone(),
        ));
        let payment_service = Arc::new(PaymentService::new(
            payment_repo,
            plan_repo,
            coupon_service.clone(),
            notifications.clone(),
            business_name,
        ));

        Self {
            plan_service,
            addon_service,
            trainer_service,
            booking_service,
            coupon_service,
            payment_service,
            notifications,
            db_pool,
        }
    }
}
