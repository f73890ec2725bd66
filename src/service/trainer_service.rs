use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{CreateTrainerRequest, Trainer, UpdateTrainerRequest},
    error::{AppError, Result},
    repository::TrainerRepository,
};

pub struct TrainerService {
    repo: Arc<dyn TrainerRepository>,
}

impl TrainerService {
    pub fn new(repo: Arc<dyn TrainerRepository>) -> Self {
        Self { repo }
    }

    /// List trainers in display order
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Trainer>> {
        self.repo.list(include_inactive).await
    }

    /// Get a trainer by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<Trainer>> {
        self.repo.find_by_id(id).await
    }

    /// Create a new trainer profile
    pub async fn create(&self, request: CreateTrainerRequest) -> Result<Trainer> {
        if request.name.trim().is_empty() {
            return Err(AppError::BadRequest("Name is required".to_string()));
        }

        if request.experience_years < 0 {
            return Err(AppError::BadRequest(
                "Experience years cannot be negative".to_string(),
            ));
        }

        self.repo.create(request).await
    }

    /// Update an existing trainer profile
    pub async fn update(&self, id: Uuid, request: UpdateTrainerRequest) -> Result<Trainer> {
        if let Some(years) = request.experience_years {
            if years < 0 {
                return Err(AppError::BadRequest(
                    "Experience years cannot be negative".to_string(),
                ));
            }
        }

        self.repo.update(id, request).await
    }

    /// Delete a trainer profile
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Trainer not found".to_string()))?;

        self.repo.delete(id).await
    }

    /// Reorder trainers for display
    pub async fn reorder(&self, ids: &[Uuid]) -> Result<()> {
        self.repo.reorder(ids).await
    }
}
