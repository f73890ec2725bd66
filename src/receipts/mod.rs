use crate::{
    config::{ReceiptConfig, UpiConfig},
    domain::PaymentRecord,
    error::Result,
};

pub mod document;
pub mod upi;

pub use document::{layout_receipt, render_receipt_pdf, ReceiptData, ReceiptLayout};
pub use upi::{build_payment_deep_link, parse_payment_deep_link, UpiPaymentDetails};

/// Builds payment-request artifacts (deep link, QR code, PDF receipt) for
/// a payment record. Holds the payee and branding config so handlers only
/// pass the record.
pub struct ReceiptBuilder {
    upi: UpiConfig,
    branding: ReceiptConfig,
}

impl ReceiptBuilder {
    pub fn new(upi: UpiConfig, branding: ReceiptConfig) -> Self {
        Self { upi, branding }
    }

    pub fn payment_details_for(&self, payment: &PaymentRecord) -> UpiPaymentDetails {
        UpiPaymentDetails {
            payee_vpa: self.upi.payee_vpa.clone(),
            payee_name: self.upi.payee_name.clone(),
            amount: payment.final_amount,
            currency: self.upi.currency.clone(),
            transaction_note: payment.transaction_note.clone(),
        }
    }

    pub fn deep_link_for(&self, payment: &PaymentRecord) -> String {
        upi::build_payment_deep_link(&self.payment_details_for(payment))
    }

    pub fn qr_svg_for(&self, payment: &PaymentRecord) -> Result<String> {
        upi::render_qr_svg(&self.deep_link_for(payment))
    }

    pub fn qr_data_uri_for(&self, payment: &PaymentRecord) -> Result<String> {
        upi::render_qr_data_uri(&self.deep_link_for(payment))
    }

    pub fn receipt_pdf_for(&self, payment: &PaymentRecord) -> Result<Vec<u8>> {
        let data = ReceiptData::from_payment(payment, &self.branding)?;
        document::render_receipt_pdf(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::domain::{PaymentStatus, PlanDuration};

    fn builder() -> ReceiptBuilder {
        ReceiptBuilder::new(
            UpiConfig {
                payee_vpa: "repsetfitness@okaxis".to_string(),
                payee_name: "Repset Fitness".to_string(),
                currency: "INR".to_string(),
            },
            ReceiptConfig {
                business_name: "Repset Fitness".to_string(),
                address_line: "14 MG Road, Bengaluru".to_string(),
                support_email: "support@repset.fit".to_string(),
            },
        )
    }

    fn verified_payment() -> PaymentRecord {
        PaymentRecord {
            id: Uuid::new_v4(),
            customer_name: "Asha Rao".to_string(),
            customer_email: "asha@example.com".to_string(),
            customer_phone: "9876543210".to_string(),
            membership_name: "Pro".to_string(),
            duration: PlanDuration::Quarterly,
            original_price: 5499,
            discount_amount: 500,
            final_amount: 4999,
            coupon_code: Some("SAVE500".to_string()),
            transaction_note: "Membership: Pro".to_string(),
            status: PaymentStatus::Verified,
            receipt_no: Some("RCPT-7K2M9QX4".to_string()),
            payment_date: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_deep_link_uses_configured_payee_and_final_amount() {
        let link = builder().deep_link_for(&verified_payment());
        assert!(link.contains("pa=repsetfitness%40okaxis"));
        assert!(link.contains("am=4999"));
    }

    #[test]
    fn test_receipt_pdf_requires_verification_artifacts() {
        let mut payment = verified_payment();
        payment.receipt_no = None;
        let err = builder().receipt_pdf_for(&payment).unwrap_err();
        assert!(matches!(err, crate::error::AppError::Conflict(_)));
    }

    #[test]
    fn test_receipt_pdf_renders_for_verified_payment() {
        let bytes = builder().receipt_pdf_for(&verified_payment()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
