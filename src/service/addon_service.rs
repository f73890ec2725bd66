use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{Addon, CreateAddonRequest, UpdateAddonRequest},
    error::{AppError, Result},
    repository::AddonRepository,
};

pub struct AddonService {
    repo: Arc<dyn AddonRepository>,
}

impl AddonService {
    pub fn new(repo: Arc<dyn AddonRepository>) -> Self {
        Self { repo }
    }

    /// List add-on services in display order
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Addon>> {
        self.repo.list(include_inactive).await
    }

    /// Get an addon by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<Addon>> {
        self.repo.find_by_id(id).await
    }

    /// Get an addon by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Addon>> {
        self.repo.find_by_slug(slug).await
    }

    /// Create a new addon
    pub async fn create(&self, request: CreateAddonRequest) -> Result<Addon> {
        if request.price < 0 {
            return Err(AppError::BadRequest("Price cannot be negative".to_string()));
        }

        if let Some(minutes) = request.duration_minutes {
            if minutes <= 0 {
                return Err(AppError::BadRequest(
                    "Session duration must be positive".to_string(),
                ));
            }
        }

        // Check for duplicate slug if provided
        if let Some(ref slug) = request.slug {
            if self.repo.find_by_slug(slug).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "Addon with slug '{}' already exists",
                    slug
                )));
            }
        }

        self.repo.create(request).await
    }

    /// Update an existing addon
    pub async fn update(&self, id: Uuid, request: UpdateAddonRequest) -> Result<Addon> {
        if let Some(price) = request.price {
            if price < 0 {
                return Err(AppError::BadRequest("Price cannot be negative".to_string()));
            }
        }

        if let Some(minutes) = request.duration_minutes {
            if minutes <= 0 {
                return Err(AppError::BadRequest(
                    "Session duration must be positive".to_string(),
                ));
            }
        }

        self.repo.update(id, request).await
    }

    /// Delete an addon
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Addon not found".to_string()))?;

        // Cannot delete if bookings reference it
        let usage_count = self.repo.count_usage(id).await?;
        if usage_count > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete addon: {} bookings still reference it. Deactivate instead.",
                usage_count
            )));
        }

        self.repo.delete(id).await
    }

    /// Reorder addons for display
    pub async fn reorder(&self, ids: &[Uuid]) -> Result<()> {
        self.repo.reorder(ids).await
    }
}
