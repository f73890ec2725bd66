use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::PlanDuration;

/// A customer-submitted UPI payment awaiting admin verification.
///
/// Amounts are whole rupees. The record is the single source of truth for
/// the receipt: regenerating a receipt for the same record always yields
/// the same document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub membership_name: String,
    pub duration: PlanDuration,
    pub original_price: i64,
    pub discount_amount: i64,
    pub final_amount: i64,
    pub coupon_code: Option<String>,
    pub transaction_note: String,
    pub status: PaymentStatus,
    /// Assigned exactly once, when the payment is verified.
    pub receipt_no: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum PaymentStatus {
    Pending,
    Verified,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Verified => "Verified",
            PaymentStatus::Rejected => "Rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(PaymentStatus::Pending),
            "Verified" => Some(PaymentStatus::Verified),
            "Rejected" => Some(PaymentStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordPaymentRequest {
    pub plan_slug: String,
    #[validate(length(min = 2, max = 120))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 7, max = 15))]
    pub customer_phone: String,
    pub coupon_code: Option<String>,
    /// Free-form note carried into the UPI deep link. Defaults to a
    /// "<business> membership: <plan>" line when absent.
    #[validate(length(max = 120))]
    pub transaction_note: Option<String>,
}

/// Final payable amount under the pricing invariant: the discount must not
/// be negative and must not exceed the original price.
pub fn compute_final_amount(original_price: i64, discount_amount: i64) -> Option<i64> {
    if original_price < 0 || discount_amount < 0 || discount_amount > original_price {
        return None;
    }
    Some(original_price - discount_amount)
}

/// Render whole rupees with exactly two decimal places, e.g. `₹5499.00`.
pub fn format_inr(amount: i64) -> String {
    format!("₹{}.00", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_final_amount() {
        assert_eq!(compute_final_amount(5499, 500), Some(4999));
        assert_eq!(compute_final_amount(5499, 0), Some(5499));
        assert_eq!(compute_final_amount(500, 500), Some(0));
        assert_eq!(compute_final_amount(500, 501), None);
        assert_eq!(compute_final_amount(500, -1), None);
        assert_eq!(compute_final_amount(-1, 0), None);
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(5499), "₹5499.00");
        assert_eq!(format_inr(0), "₹0.00");
        assert_eq!(format_inr(500), "₹500.00");
    }
}
