use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::{
    config::ReceiptConfig,
    domain::{format_inr, PaymentRecord},
    error::{AppError, Result},
};

// A5 portrait.
pub const PAGE_WIDTH_MM: f32 = 148.0;
pub const PAGE_HEIGHT_MM: f32 = 210.0;
pub const MARGIN_MM: f32 = 16.0;

/// Everything the receipt template needs, already formatted for print.
/// Built from a verified payment record plus the branding config.
#[derive(Debug, Clone)]
pub struct ReceiptData {
    pub business_name: String,
    pub address_line: String,
    pub support_email: String,
    pub receipt_no: String,
    pub payment_date: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub membership_name: String,
    pub duration_label: String,
    pub original_price: i64,
    pub discount_amount: i64,
    pub final_amount: i64,
    pub coupon_code: Option<String>,
}

impl ReceiptData {
    pub fn from_payment(payment: &PaymentRecord, branding: &ReceiptConfig) -> Result<Self> {
        let receipt_no = payment.receipt_no.clone().ok_or_else(|| {
            AppError::Conflict("Receipt is available only for verified payments".to_string())
        })?;
        let payment_date = payment.payment_date.ok_or_else(|| {
            AppError::Conflict("Receipt is available only for verified payments".to_string())
        })?;

        Ok(Self {
            business_name: branding.business_name.clone(),
            address_line: branding.address_line.clone(),
            support_email: branding.support_email.clone(),
            receipt_no,
            payment_date: payment_date.format("%d %b %Y").to_string(),
            customer_name: payment.customer_name.clone(),
            customer_email: payment.customer_email.clone(),
            customer_phone: payment.customer_phone.clone(),
            membership_name: payment.membership_name.clone(),
            duration_label: payment.duration.display_label().to_string(),
            original_price: payment.original_price,
            discount_amount: payment.discount_amount,
            final_amount: payment.final_amount,
            coupon_code: payment.coupon_code.clone(),
        })
    }
}

/// One line of text at an absolute position. `y_mm` is measured from the
/// top edge; the PDF emitter flips it, so layout math reads top-down.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub y_mm: f32,
    pub size_pt: f32,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLayout {
    pub title: String,
    pub lines: Vec<PlacedLine>,
}

impl ReceiptLayout {
    pub fn line_text(&self, prefix: &str) -> Option<&PlacedLine> {
        self.lines.iter().find(|l| l.text.starts_with(prefix))
    }
}

fn body(text: impl Into<String>, y_mm: f32) -> PlacedLine {
    PlacedLine {
        text: text.into(),
        y_mm,
        size_pt: 10.0,
        bold: false,
    }
}

fn heading(text: impl Into<String>, y_mm: f32) -> PlacedLine {
    PlacedLine {
        text: text.into(),
        y_mm,
        size_pt: 11.0,
        bold: true,
    }
}

/// Place every line of the receipt. Pure: same data, same layout. The
/// discount line is the only conditional element; the total moves up with
/// it so the pricing block never shows a gap.
pub fn layout_receipt(data: &ReceiptData) -> ReceiptLayout {
    let mut lines = Vec::new();

    // Header band
    lines.push(PlacedLine {
        text: data.business_name.clone(),
        y_mm: 24.0,
        size_pt: 18.0,
        bold: true,
    });
    if !data.address_line.is_empty() {
        lines.push(PlacedLine {
            text: data.address_line.clone(),
            y_mm: 31.0,
            size_pt: 9.0,
            bold: false,
        });
    }

    lines.push(PlacedLine {
        text: "PAYMENT RECEIPT".to_string(),
        y_mm: 46.0,
        size_pt: 13.0,
        bold: true,
    });
    lines.push(PlacedLine {
        text: format!("Receipt No: {}", data.receipt_no),
        y_mm: 53.0,
        size_pt: 9.0,
        bold: false,
    });
    lines.push(PlacedLine {
        text: format!("Date: {}", data.payment_date),
        y_mm: 58.0,
        size_pt: 9.0,
        bold: false,
    });

    // Customer block
    lines.push(heading("CUSTOMER", 72.0));
    lines.push(body(data.customer_name.clone(), 79.0));
    lines.push(body(data.customer_email.clone(), 84.0));
    lines.push(body(data.customer_phone.clone(), 89.0));

    // Membership block
    lines.push(heading("MEMBERSHIP", 101.0));
    lines.push(body(format!("Plan: {}", data.membership_name), 108.0));
    lines.push(body(format!("Duration: {}", data.duration_label), 113.0));

    // Pricing block
    lines.push(heading("PAYMENT", 125.0));
    let mut y = 132.0;
    lines.push(body(
        format!("Original Price: {}", format_inr(data.original_price)),
        y,
    ));
    y += 5.0;
    if data.discount_amount > 0 {
        let code = data.coupon_code.as_deref().unwrap_or("DISCOUNT");
        lines.push(body(
            format!("Discount ({}): -{}", code, format_inr(data.discount_amount)),
            y,
        ));
        y += 5.0;
    }
    y += 3.0;
    lines.push(PlacedLine {
        text: format!("Total Amount Paid: {}", format_inr(data.final_amount)),
        y_mm: y,
        size_pt: 12.0,
        bold: true,
    });

    // Footer
    lines.push(PlacedLine {
        text: "Thank you for training with us.".to_string(),
        y_mm: 188.0,
        size_pt: 8.0,
        bold: false,
    });
    if !data.support_email.is_empty() {
        lines.push(PlacedLine {
            text: format!("Questions? Write to {}", data.support_email),
            y_mm: 193.0,
            size_pt: 8.0,
            bold: false,
        });
    }

    ReceiptLayout {
        title: format!("Receipt {}", data.receipt_no),
        lines,
    }
}

/// Render the layout onto an A5 page. Rendering happens entirely in
/// memory; a failure leaves nothing to roll back.
pub fn render_receipt_pdf(data: &ReceiptData) -> Result<Vec<u8>> {
    let layout = layout_receipt(data);
    emit_pdf(&layout)
}

fn emit_pdf(layout: &ReceiptLayout) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        layout.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "receipt",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::DocumentRender(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::DocumentRender(e.to_string()))?;

    for line in &layout.lines {
        let font = if line.bold { &bold } else { &regular };
        layer.use_text(
            line.text.as_str(),
            line.size_pt,
            Mm(MARGIN_MM),
            Mm(PAGE_HEIGHT_MM - line.y_mm),
            font,
        );
    }

    doc.save_to_bytes()
        .map_err(|e| AppError::DocumentRender(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data(discount: i64, coupon: Option<&str>) -> ReceiptData {
        ReceiptData {
            business_name: "Repset Fitness".to_string(),
            address_line: "14 MG Road, Bengaluru".to_string(),
            support_email: "support@repset.fit".to_string(),
            receipt_no: "RCPT-7K2M9QX4".to_string(),
            payment_date: "23 Aug 2026".to_string(),
            customer_name: "Asha Rao".to_string(),
            customer_email: "asha@example.com".to_string(),
            customer_phone: "9876543210".to_string(),
            membership_name: "Pro".to_string(),
            duration_label: "6 Months".to_string(),
            original_price: 5499,
            discount_amount: discount,
            final_amount: 5499 - discount,
            coupon_code: coupon.map(|c| c.to_string()),
        }
    }

    #[test]
    fn test_layout_discount_scenario() {
        let layout = layout_receipt(&sample_data(500, Some("SAVE500")));
        let texts: Vec<&str> = layout.lines.iter().map(|l| l.text.as_str()).collect();

        assert!(texts.contains(&"Original Price: ₹5499.00"));
        assert!(texts.contains(&"Discount (SAVE500): -₹500.00"));
        assert!(texts.contains(&"Total Amount Paid: ₹4999.00"));
    }

    #[test]
    fn test_layout_omits_discount_line_when_zero() {
        let layout = layout_receipt(&sample_data(0, None));
        assert!(layout.line_text("Discount").is_none());
        assert!(layout.line_text("Total Amount Paid: ₹5499.00").is_some());
    }

    #[test]
    fn test_discount_line_sits_between_price_and_total() {
        let layout = layout_receipt(&sample_data(500, Some("SAVE500")));
        let original = layout.line_text("Original Price").unwrap().y_mm;
        let discount = layout.line_text("Discount").unwrap().y_mm;
        let total = layout.line_text("Total Amount Paid").unwrap().y_mm;

        assert!(original < discount);
        assert!(discount < total);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let a = layout_receipt(&sample_data(500, Some("SAVE500")));
        let b = layout_receipt(&sample_data(500, Some("SAVE500")));
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_lines_fit_on_the_page() {
        let layout = layout_receipt(&sample_data(500, Some("SAVE500")));
        for line in &layout.lines {
            assert!(line.y_mm > 0.0 && line.y_mm < PAGE_HEIGHT_MM);
        }
    }

    #[test]
    fn test_pdf_emission() {
        let bytes = render_receipt_pdf(&sample_data(500, Some("SAVE500"))).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
