use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored remote image plus its derived display URLs. Created by upload,
/// immutable afterwards; the variants are pure functions of `url` and are
/// never persisted separately.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MediaAsset {
    pub url: String,
    pub public_id: String,
    pub variants: ResponsiveVariants,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResponsiveVariants {
    pub thumbnail: String,
    pub small: String,
    pub medium: String,
    pub large: String,
    pub webp_small: String,
    pub webp_medium: String,
}

impl ResponsiveVariants {
    /// Degraded single-variant result: every key carries the original URL.
    /// Used when no canonical identifier can be extracted.
    pub fn passthrough(url: &str) -> Self {
        Self {
            thumbnail: url.to_string(),
            small: url.to_string(),
            medium: url.to_string(),
            large: url.to_string(),
            webp_small: url.to_string(),
            webp_medium: url.to_string(),
        }
    }
}
