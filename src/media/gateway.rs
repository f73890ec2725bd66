use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AppError, Result};

/// One upload attempt against a single preset. The orchestrator owns
/// validation and the fallback chain; a gateway does exactly one request.
#[async_trait]
pub trait UploadGateway: Send + Sync {
    async fn upload(&self, upload: &UploadRequest<'_>) -> Result<RemoteAsset>;
}

pub struct UploadRequest<'a> {
    pub bytes: &'a [u8],
    pub filename: &'a str,
    pub content_type: &'a str,
    pub preset: &'a str,
    pub folder: &'a str,
    /// Comma-separated tag list attached to the asset on the media host.
    pub tags: Option<&'a str>,
    /// Key=value metadata stored alongside the asset on the media host.
    pub context: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteAsset {
    pub secure_url: String,
    pub public_id: String,
}

/// Unsigned uploads to a Cloudinary-compatible endpoint.
pub struct CloudinaryGateway {
    http: reqwest::Client,
    endpoint: String,
}

impl CloudinaryGateway {
    pub fn new(cloud_name: &str, api_base: Option<&str>) -> Self {
        let base = api_base.unwrap_or("https://api.cloudinary.com/v1_1");
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/{}/image/upload", base.trim_end_matches('/'), cloud_name),
        }
    }
}

#[async_trait]
impl UploadGateway for CloudinaryGateway {
    async fn upload(&self, upload: &UploadRequest<'_>) -> Result<RemoteAsset> {
        let part = reqwest::multipart::Part::bytes(upload.bytes.to_vec())
            .file_name(upload.filename.to_string())
            .mime_str(upload.content_type)
            .map_err(|e| AppError::UploadFailed(format!("Invalid mime type: {}", e)))?;

        let mut form = reqwest::multipart::Form::new()
            .text("upload_preset", upload.preset.to_string())
            .text("folder", upload.folder.to_string())
            .part("file", part);

        if let Some(tags) = upload.tags {
            form = form.text("tags", tags.to_string());
        }
        if let Some(context) = upload.context {
            form = form.text("context", context.to_string());
        }

        let resp = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::UploadFailed(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AppError::UploadFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(AppError::UploadFailed(format!("Status {}: {}", status, text)));
        }

        serde_json::from_str(&text).map_err(|e| {
            AppError::UploadFailed(format!("Failed to parse response: {} - body: {}", e, text))
        })
    }
}
