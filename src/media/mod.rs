use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::{
    config::MediaConfig,
    domain::MediaAsset,
    error::{AppError, Result},
};

pub mod gateway;
pub mod variants;

pub use gateway::{CloudinaryGateway, RemoteAsset, UploadGateway, UploadRequest};
pub use variants::{derive_responsive_variants, extract_public_id};

/// MIME types accepted for upload. Everything else is rejected before any
/// network traffic.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/avif",
];

const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Uploads images to the media host, walking an ordered preset list until
/// one succeeds. Each call is independent; concurrent uploads share
/// nothing but the HTTP client inside the gateway.
pub struct MediaUploader {
    gateway: Arc<dyn UploadGateway>,
    presets: Vec<String>,
    default_folder: String,
    max_file_size_bytes: usize,
}

impl MediaUploader {
    pub fn new(
        gateway: Arc<dyn UploadGateway>,
        presets: Vec<String>,
        default_folder: String,
        max_file_size_bytes: usize,
    ) -> Self {
        Self {
            gateway,
            presets,
            default_folder,
            max_file_size_bytes,
        }
    }

    /// None when media uploads are disabled or the cloud name is missing;
    /// the server then runs without the upload endpoint.
    pub fn from_config(config: &MediaConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let cloud_name = config.cloud_name.as_deref()?;
        let gateway = CloudinaryGateway::new(cloud_name, config.api_base.as_deref());

        Some(Self::new(
            Arc::new(gateway),
            config.upload_presets.clone(),
            config
                .default_folder
                .clone()
                .unwrap_or_else(|| "repset".to_string()),
            config
                .max_file_size_bytes
                .unwrap_or(DEFAULT_MAX_FILE_SIZE_BYTES),
        ))
    }

    pub async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
        folder: Option<&str>,
        tags: Option<&str>,
    ) -> Result<MediaAsset> {
        // Validation happens before any network call.
        if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
            return Err(AppError::InvalidFileType(format!(
                "{} is not an accepted image type",
                content_type
            )));
        }
        if bytes.len() > self.max_file_size_bytes {
            return Err(AppError::FileTooLarge(format!(
                "{} bytes exceeds the {} byte limit",
                bytes.len(),
                self.max_file_size_bytes
            )));
        }
        if self.presets.is_empty() {
            return Err(AppError::UploadFailed(
                "No upload presets configured".to_string(),
            ));
        }

        let fingerprint = hex::encode(Sha256::digest(bytes));
        let context = format!("sha256={}", &fingerprint[..16]);
        let folder = folder.unwrap_or(&self.default_folder);

        // Fallback chain, not a retry loop: each attempt targets a
        // different preset, failures are swallowed until the list runs out.
        let mut last_error: Option<AppError> = None;

        for preset in &self.presets {
            let request = UploadRequest {
                bytes,
                filename,
                content_type,
                preset,
                folder,
                tags,
                context: Some(&context),
            };

            match self.gateway.upload(&request).await {
                Ok(remote) => {
                    let variants = derive_responsive_variants(&remote.secure_url);
                    return Ok(MediaAsset {
                        url: remote.secure_url,
                        public_id: remote.public_id,
                        variants,
                    });
                }
                Err(e) => {
                    tracing::debug!("Upload preset {} failed: {}", preset, e);
                    last_error = Some(e);
                }
            }
        }

        let detail = match last_error {
            Some(AppError::UploadFailed(msg)) => msg,
            Some(e) => e.to_string(),
            None => "No upload attempts were made".to_string(),
        };
        Err(AppError::UploadFailed(format!(
            "All upload presets failed; last error: {}",
            detail
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedGateway {
        calls: AtomicUsize,
        fail_first: usize,
        last_tags: Mutex<Option<String>>,
    }

    impl ScriptedGateway {
        fn new(fail_first: usize) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_first,
                last_tags: Mutex::new(None),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_tags(&self) -> Option<String> {
            self.last_tags.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UploadGateway for ScriptedGateway {
        async fn upload(&self, upload: &UploadRequest<'_>) -> Result<RemoteAsset> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_tags.lock().unwrap() = upload.tags.map(|t| t.to_string());
            if n < self.fail_first {
                Err(AppError::UploadFailed(format!(
                    "preset {} rejected",
                    upload.preset
                )))
            } else {
                Ok(RemoteAsset {
                    secure_url: format!(
                        "https://res.cloudinary.com/repset/image/upload/v1700000000/{}/photo.jpg",
                        upload.folder
                    ),
                    public_id: format!("{}/photo", upload.folder),
                })
            }
        }
    }

    fn uploader(gateway: Arc<ScriptedGateway>, presets: &[&str]) -> MediaUploader {
        MediaUploader::new(
            gateway,
            presets.iter().map(|p| p.to_string()).collect(),
            "gym".to_string(),
            1024,
        )
    }

    #[tokio::test]
    async fn test_disallowed_mime_rejected_before_any_network_call() {
        let gateway = ScriptedGateway::new(0);
        let uploader = uploader(gateway.clone(), &["a"]);

        let err = uploader
            .upload("doc.pdf", "application/pdf", b"%PDF", None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidFileType(_)));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_file_rejected_before_any_network_call() {
        let gateway = ScriptedGateway::new(0);
        let uploader = uploader(gateway.clone(), &["a"]);
        let big = vec![0u8; 2048];

        let err = uploader
            .upload("big.jpg", "image/jpeg", &big, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::FileTooLarge(_)));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fallback_chain_stops_at_first_success() {
        let gateway = ScriptedGateway::new(2);
        let uploader = uploader(gateway.clone(), &["a", "b", "c"]);

        let asset = uploader
            .upload("photo.jpg", "image/jpeg", b"fake image", None, None)
            .await
            .unwrap();

        assert_eq!(gateway.call_count(), 3);
        assert_eq!(asset.public_id, "gym/photo");
        assert!(asset.variants.thumbnail.contains("w_150,h_150"));
    }

    #[tokio::test]
    async fn test_exhausted_chain_carries_last_preset_error() {
        let gateway = ScriptedGateway::new(3);
        let uploader = uploader(gateway.clone(), &["a", "b", "c"]);

        let err = uploader
            .upload("photo.jpg", "image/jpeg", b"fake image", None, None)
            .await
            .unwrap_err();

        assert_eq!(gateway.call_count(), 3);
        match err {
            AppError::UploadFailed(msg) => assert!(msg.contains("preset c rejected")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_folder_and_tags_pass_through() {
        let gateway = ScriptedGateway::new(0);
        let uploader = uploader(gateway.clone(), &["a"]);

        let asset = uploader
            .upload(
                "photo.jpg",
                "image/jpeg",
                b"fake image",
                Some("trainers"),
                Some("trainer,profile"),
            )
            .await
            .unwrap();

        assert_eq!(asset.public_id, "trainers/photo");
        assert_eq!(gateway.last_tags().as_deref(), Some("trainer,profile"));
    }
}
