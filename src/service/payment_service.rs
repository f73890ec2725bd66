use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{compute_final_amount, PaymentRecord, PaymentStatus, RecordPaymentRequest},
    error::{AppError, Result},
    notifications::{DomainEvent, NotificationCenter},
    repository::{MembershipPlanRepository, PaymentRepository},
    service::coupon_service::CouponService,
};

const RECEIPT_NO_ATTEMPTS: usize = 5;

pub struct PaymentService {
    payment_repo: Arc<dyn PaymentRepository>,
    plan_repo: Arc<dyn MembershipPlanRepository>,
    coupon_service: Arc<CouponService>,
    notifications: Arc<NotificationCenter>,
    business_name: String,
}

impl PaymentService {
    pub fn new(
        payment_repo: Arc<dyn PaymentRepository>,
        plan_repo: Arc<dyn MembershipPlanRepository>,
        coupon_service: Arc<CouponService>,
        notifications: Arc<NotificationCenter>,
        business_name: String,
    ) -> Self {
        Self {
            payment_repo,
            plan_repo,
            coupon_service,
            notifications,
            business_name,
        }
    }

    /// Record a customer's payment intent. Prices come from the plan and
    /// the coupon table, never from the request, so the stored amounts
    /// always satisfy final = original - discount.
    pub async fn record(&self, request: RecordPaymentRequest) -> Result<PaymentRecord> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let plan = self
            .plan_repo
            .find_by_slug(&request.plan_slug)
            .await?
            .ok_or_else(|| AppError::BadRequest("Unknown membership plan".to_string()))?;

        if !plan.is_active {
            return Err(AppError::BadRequest(
                "This plan is not currently available".to_string(),
            ));
        }

        let original_price = plan.price;
        let (coupon_code, discount_amount) = match request.coupon_code.as_deref() {
            Some(code) if !code.trim().is_empty() => {
                let applied = self
                    .coupon_service
                    .apply(code, original_price, Utc::now())
                    .await?;
                (Some(applied.code), applied.discount_amount)
            }
            _ => (None, 0),
        };

        let final_amount = compute_final_amount(original_price, discount_amount)
            .ok_or_else(|| AppError::Validation("Discount exceeds the plan price".to_string()))?;

        let transaction_note = request
            .transaction_note
            .filter(|note| !note.trim().is_empty())
            .unwrap_or_else(|| format!("{} membership: {}", self.business_name, plan.name));

        let payment = PaymentRecord {
            id: Uuid::new_v4(),
            customer_name: request.customer_name,
            customer_email: request.customer_email,
            customer_phone: request.customer_phone,
            membership_name: plan.name,
            duration: plan.duration,
            original_price,
            discount_amount,
            final_amount,
            coupon_code,
            transaction_note,
            status: PaymentStatus::Pending,
            receipt_no: None,
            payment_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let created = self.payment_repo.create(payment).await?;

        self.notifications
            .dispatch(DomainEvent::PaymentRecorded(created.clone()))
            .await;

        Ok(created)
    }

    /// Get a payment by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<PaymentRecord>> {
        self.payment_repo.find_by_id(id).await
    }

    /// List payments, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<PaymentRecord>> {
        self.payment_repo.list(limit, offset).await
    }

    /// List payments in a given status
    pub async fn list_by_status(&self, status: PaymentStatus) -> Result<Vec<PaymentRecord>> {
        self.payment_repo.list_by_status(status).await
    }

    /// Mark a pending payment as verified. Assigns the receipt number and
    /// payment date exactly once; a verified record never changes again,
    /// which is what keeps receipt regeneration deterministic.
    pub async fn verify(&self, id: Uuid) -> Result<PaymentRecord> {
        let payment = self
            .payment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if payment.status != PaymentStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Only pending payments can be verified (current status: {})",
                payment.status.as_str()
            )));
        }

        let receipt_no = self.unique_receipt_no().await?;
        let verified = self.payment_repo.verify(id, &receipt_no).await?;

        self.notifications
            .dispatch(DomainEvent::PaymentVerified(verified.clone()))
            .await;

        Ok(verified)
    }

    /// Mark a pending payment as rejected
    pub async fn reject(&self, id: Uuid) -> Result<PaymentRecord> {
        let payment = self
            .payment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if payment.status != PaymentStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Only pending payments can be rejected (current status: {})",
                payment.status.as_str()
            )));
        }

        let rejected = self
            .payment_repo
            .update_status(id, PaymentStatus::Rejected)
            .await?;

        self.notifications
            .dispatch(DomainEvent::PaymentRejected(rejected.clone()))
            .await;

        Ok(rejected)
    }

    /// Delete a payment record
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.payment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        self.payment_repo.delete(id).await
    }

    async fn unique_receipt_no(&self) -> Result<String> {
        for _ in 0..RECEIPT_NO_ATTEMPTS {
            let candidate = generate_receipt_no();
            if self
                .payment_repo
                .find_by_receipt_no(&candidate)
                .await?
                .is_none()
            {
                return Ok(candidate);
            }
        }
        Err(AppError::Internal(
            "Could not allocate a receipt number".to_string(),
        ))
    }
}

/// `RCPT-` plus 8 characters. The charset drops 0/O/1/I so the number can
/// be read back over the phone without ambiguity.
fn generate_receipt_no() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();

    format!("RCPT-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_no_shape() {
        let receipt_no = generate_receipt_no();
        assert!(receipt_no.starts_with("RCPT-"));
        assert_eq!(receipt_no.len(), 13);
        assert!(receipt_no[5..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_receipt_no_avoids_ambiguous_characters() {
        for _ in 0..50 {
            let receipt_no = generate_receipt_no();
            assert!(receipt_no[5..].chars().all(|c| !"0O1I".contains(c)));
        }
    }
}
