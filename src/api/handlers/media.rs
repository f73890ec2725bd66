use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    api::state::AppState,
    auth::AuthContext,
    domain::MediaAsset,
    error::{AppError, Result},
    notifications::DomainEvent,
};

/// Accepted multipart bodies can exceed the uploader's own size limit so
/// oversized files reach its check and get a precise error back.
pub const UPLOAD_BODY_LIMIT: usize = 12 * 1024 * 1024;

struct UploadFields {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
    folder: Option<String>,
    tags: Option<String>,
}

async fn read_upload_fields(mut multipart: Multipart) -> Result<UploadFields> {
    let mut folder: Option<String> = None;
    let mut tags: Option<String> = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "folder" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Unreadable folder field: {}", e)))?;
                if !value.trim().is_empty() {
                    folder = Some(value);
                }
            }
            "tags" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Unreadable tags field: {}", e)))?;
                if !value.trim().is_empty() {
                    tags = Some(value);
                }
            }
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Unreadable file field: {}", e)))?;
                file = Some((filename, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (filename, content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("Missing file field".to_string()))?;

    Ok(UploadFields {
        filename,
        content_type,
        bytes,
        folder,
        tags,
    })
}

/// Image upload for plan, add-on and trainer photos. Multipart fields:
/// `file` (required), `folder` (optional override of the configured
/// default) and `tags` (optional comma-separated labels).
pub async fn upload(
    State(state): State<AppState>,
    Extension(_identity): Extension<AuthContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MediaAsset>)> {
    let uploader = state.media.as_ref().ok_or_else(|| {
        AppError::BadRequest("Media uploads are not configured on this server".to_string())
    })?;

    let fields = read_upload_fields(multipart).await?;

    let asset = uploader
        .upload(
            &fields.filename,
            &fields.content_type,
            &fields.bytes,
            fields.folder.as_deref(),
            fields.tags.as_deref(),
        )
        .await?;

    state
        .service_context
        .notifications
        .dispatch(DomainEvent::MediaUploaded(asset.clone()))
        .await;

    Ok((StatusCode::CREATED, Json(asset)))
}
