use std::sync::Arc;
use crate::{
    auth::IdentityVerifier,
    config::Settings,
    media::MediaUploader,
    receipts::ReceiptBuilder,
    service::ServiceContext,
};

#[derive(Clone)]
pub struct AppState {
    pub service_context: Arc<ServiceContext>,
    pub media: Option<Arc<MediaUploader>>,
    pub receipts: Arc<ReceiptBuilder>,
    pub identity: Arc<IdentityVerifier>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        service_context: Arc<ServiceContext>,
        media: Option<Arc<MediaUploader>>,
        receipts: Arc<ReceiptBuilder>,
        identity: Arc<IdentityVerifier>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            service_context,
            media,
            receipts,
            identity,
            settings,
        }
    }
}
