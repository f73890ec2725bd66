use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{Coupon, CreateCouponRequest, UpdateCouponRequest},
    error::{AppError, Result},
    repository::CouponRepository,
};

/// A coupon resolved against a plan price, ready to fold into a payment.
#[derive(Debug, Clone)]
pub struct AppliedCoupon {
    pub code: String,
    pub discount_amount: i64,
}

pub struct CouponService {
    repo: Arc<dyn CouponRepository>,
}

impl CouponService {
    pub fn new(repo: Arc<dyn CouponRepository>) -> Self {
        Self { repo }
    }

    /// List all coupons
    pub async fn list(&self) -> Result<Vec<Coupon>> {
        self.repo.list().await
    }

    /// Get a coupon by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<Coupon>> {
        self.repo.find_by_id(id).await
    }

    /// Create a new coupon
    pub async fn create(&self, request: CreateCouponRequest) -> Result<Coupon> {
        if request.code.trim().is_empty() {
            return Err(AppError::BadRequest("Coupon code is required".to_string()));
        }

        if request.discount <= 0 {
            return Err(AppError::BadRequest(
                "Discount must be positive".to_string(),
            ));
        }

        if self.repo.find_by_code(&request.code).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Coupon '{}' already exists",
                request.code.trim().to_uppercase()
            )));
        }

        self.repo.create(request).await
    }

    /// Update an existing coupon
    pub async fn update(&self, id: Uuid, request: UpdateCouponRequest) -> Result<Coupon> {
        if let Some(discount) = request.discount {
            if discount <= 0 {
                return Err(AppError::BadRequest(
                    "Discount must be positive".to_string(),
                ));
            }
        }

        self.repo.update(id, request).await
    }

    /// Delete a coupon
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Coupon not found".to_string()))?;

        self.repo.delete(id).await
    }

    /// Resolve a customer-entered code against a plan price. The discount
    /// must never exceed the price it is applied to.
    pub async fn apply(
        &self,
        code: &str,
        original_price: i64,
        now: DateTime<Utc>,
    ) -> Result<AppliedCoupon> {
        let coupon = self
            .repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid coupon code".to_string()))?;

        if !coupon.is_active {
            return Err(AppError::BadRequest(
                "This coupon is no longer active".to_string(),
            ));
        }

        if coupon.is_expired(now) {
            return Err(AppError::BadRequest("This coupon has expired".to_string()));
        }

        if coupon.discount > original_price {
            return Err(AppError::BadRequest(
                "Coupon discount exceeds the plan price".to_string(),
            ));
        }

        Ok(AppliedCoupon {
            code: coupon.code,
            discount_amount: coupon.discount,
        })
    }
}
