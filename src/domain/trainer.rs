use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Trainer {
    pub id: Uuid,
    pub name: String,
    pub specialty: String,
    pub bio: Option<String>,
    /// Canonical media-host URL; responsive variants are derived from it
    /// on the way out, never stored.
    pub photo_url: Option<String>,
    pub experience_years: i32,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrainerRequest {
    pub name: String,
    pub specialty: String,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub experience_years: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTrainerRequest {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub experience_years: Option<i32>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
