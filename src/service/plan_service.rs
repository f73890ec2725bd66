use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        CreateMembershipPlanRequest, MembershipPlan, PlanDuration, UpdateMembershipPlanRequest,
    },
    error::{AppError, Result},
    repository::MembershipPlanRepository,
};

pub struct PlanService {
    repo: Arc<dyn MembershipPlanRepository>,
}

impl PlanService {
    pub fn new(repo: Arc<dyn MembershipPlanRepository>) -> Self {
        Self { repo }
    }

    /// List membership plans in display order
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<MembershipPlan>> {
        self.repo.list(include_inactive).await
    }

    /// Get a plan by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<MembershipPlan>> {
        self.repo.find_by_id(id).await
    }

    /// Get a plan by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<MembershipPlan>> {
        self.repo.find_by_slug(slug).await
    }

    /// Create a new membership plan
    pub async fn create(&self, request: CreateMembershipPlanRequest) -> Result<MembershipPlan> {
        if PlanDuration::from_str(&request.duration).is_none() {
            return Err(AppError::BadRequest(format!(
                "Invalid plan duration: {}. Expected one of: monthly, quarterly, half-yearly, yearly",
                request.duration
            )));
        }

        if request.price < 0 {
            return Err(AppError::BadRequest("Price cannot be negative".to_string()));
        }

        // Check for duplicate slug if provided
        if let Some(ref slug) = request.slug {
            if self.repo.find_by_slug(slug).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "Plan with slug '{}' already exists",
                    slug
                )));
            }
        }

        self.repo.create(request).await
    }

    /// Update an existing plan
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateMembershipPlanRequest,
    ) -> Result<MembershipPlan> {
        if let Some(ref duration) = request.duration {
            if PlanDuration::from_str(duration).is_none() {
                return Err(AppError::BadRequest(format!(
                    "Invalid plan duration: {}. Expected one of: monthly, quarterly, half-yearly, yearly",
                    duration
                )));
            }
        }

        if let Some(price) = request.price {
            if price < 0 {
                return Err(AppError::BadRequest("Price cannot be negative".to_string()));
            }
        }

        self.repo.update(id, request).await
    }

    /// Delete a plan. Payment records keep a snapshot of the plan name, so
    /// deleting a plan never orphans them.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership plan not found".to_string()))?;

        self.repo.delete(id).await
    }

    /// Reorder plans for display
    pub async fn reorder(&self, ids: &[Uuid]) -> Result<()> {
        self.repo.reorder(ids).await
    }

    /// Seed default plans
    pub async fn seed_defaults(&self) -> Result<Vec<MembershipPlan>> {
        self.repo.seed_defaults().await
    }
}
