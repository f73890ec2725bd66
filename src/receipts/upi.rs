use base64::Engine;
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use serde::Deserialize;

use crate::error::{AppError, Result};

/// Rendered QR codes are scaled up to at least this many pixels per side
/// so phone cameras can lock on from a laptop screen.
pub const QR_MIN_DIMENSION: u32 = 320;

/// Payee-side fields of a UPI payment request. Assembled per request from
/// configuration plus the payment record; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpiPaymentDetails {
    pub payee_vpa: String,
    pub payee_name: String,
    /// Whole currency units.
    pub amount: i64,
    pub currency: String,
    pub transaction_note: String,
}

#[derive(Deserialize)]
struct DeepLinkParams {
    pa: String,
    pn: String,
    am: i64,
    cu: String,
    tn: String,
}

/// Format the `upi://pay` deep link understood by every UPI app.
///
/// Parameter order is fixed (pa, pn, am, cu, tn) and the amount is whole
/// currency units, so identical input always yields byte-identical output.
pub fn build_payment_deep_link(details: &UpiPaymentDetails) -> String {
    format!(
        "upi://pay?pa={}&pn={}&am={}&cu={}&tn={}",
        urlencoding::encode(&details.payee_vpa),
        urlencoding::encode(&details.payee_name),
        details.amount,
        details.currency,
        urlencoding::encode(&details.transaction_note),
    )
}

/// Recover the fields of a deep link produced by [`build_payment_deep_link`].
pub fn parse_payment_deep_link(link: &str) -> Result<UpiPaymentDetails> {
    let query = link
        .strip_prefix("upi://pay?")
        .ok_or_else(|| AppError::BadRequest("Not a upi://pay link".to_string()))?;

    let params: DeepLinkParams = serde_urlencoded::from_str(query)
        .map_err(|e| AppError::BadRequest(format!("Malformed UPI link: {}", e)))?;

    Ok(UpiPaymentDetails {
        payee_vpa: params.pa,
        payee_name: params.pn,
        amount: params.am,
        currency: params.cu,
        transaction_note: params.tn,
    })
}

/// Render the deep link as an SVG QR code. Error correction is fixed at
/// level M; failures mean the input exceeded QR capacity and are terminal.
pub fn render_qr_svg(deep_link: &str) -> Result<String> {
    let code = QrCode::with_error_correction_level(deep_link.as_bytes(), EcLevel::M)
        .map_err(|e| AppError::Encoding(e.to_string()))?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

/// Same QR code as a `data:` URI, ready to drop into an `<img src>`.
pub fn render_qr_data_uri(deep_link: &str) -> Result<String> {
    let svg = render_qr_svg(deep_link)?;
    Ok(format!(
        "data:image/svg+xml;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(svg)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_details() -> UpiPaymentDetails {
        UpiPaymentDetails {
            payee_vpa: "repsetfitness@okaxis".to_string(),
            payee_name: "Repset Fitness".to_string(),
            amount: 4999,
            currency: "INR".to_string(),
            transaction_note: "Membership: Pro".to_string(),
        }
    }

    #[test]
    fn test_deep_link_golden_string() {
        let link = build_payment_deep_link(&sample_details());
        assert_eq!(
            link,
            "upi://pay?pa=repsetfitness%40okaxis&pn=Repset%20Fitness&am=4999&cu=INR&tn=Membership%3A%20Pro"
        );
    }

    #[test]
    fn test_deep_link_is_deterministic() {
        let a = build_payment_deep_link(&sample_details());
        let b = build_payment_deep_link(&sample_details());
        assert_eq!(a, b);
    }

    #[test]
    fn test_deep_link_round_trip() {
        let details = sample_details();
        let link = build_payment_deep_link(&details);
        let parsed = parse_payment_deep_link(&link).unwrap();
        assert_eq!(parsed, details);
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert!(parse_payment_deep_link("https://example.com/pay?pa=x").is_err());
    }

    #[test]
    fn test_qr_svg_renders() {
        let link = build_payment_deep_link(&sample_details());
        let svg = render_qr_svg(&link).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#000000"));
    }

    #[test]
    fn test_qr_data_uri_prefix() {
        let link = build_payment_deep_link(&sample_details());
        let uri = render_qr_data_uri(&link).unwrap();
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn test_qr_capacity_exceeded_is_encoding_error() {
        let oversized = "x".repeat(4096);
        let err = render_qr_svg(&oversized).unwrap_err();
        assert!(matches!(err, AppError::Encoding(_)));
    }
}
