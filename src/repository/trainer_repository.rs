use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateTrainerRequest, Trainer, UpdateTrainerRequest},
    error::{AppError, Result},
};

#[derive(FromRow)]
struct TrainerRow {
    id: String,
    name: String,
    specialty: String,
    bio: Option<String>,
    photo_url: Option<String>,
    experience_years: i32,
    sort_order: i32,
    is_active: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[async_trait]
pub trait TrainerRepository: Send + Sync {
    async fn create(&self, request: CreateTrainerRequest) -> Result<Trainer>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Trainer>>;
    async fn list(&self, include_inactive: bool) -> Result<Vec<Trainer>>;
    async fn update(&self, id: Uuid, request: UpdateTrainerRequest) -> Result<Trainer>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn get_next_sort_order(&self) -> Result<i32>;
    async fn reorder(&self, ids: &[Uuid]) -> Result<()>;
}

pub struct SqliteTrainerRepository {
    pool: SqlitePool,
}

impl SqliteTrainerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_trainer(row: TrainerRow) -> Result<Trainer> {
        Ok(Trainer {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            specialty: row.specialty,
            bio: row.bio,
            photo_url: row.photo_url,
            experience_years: row.experience_years,
            sort_order: row.sort_order,
            is_active: row.is_active != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl TrainerRepository for SqliteTrainerRepository {
    async fn create(&self, request: CreateTrainerRequest) -> Result<Trainer> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();
        let sort_order = self.get_next_sort_order().await?;

        sqlx::query(
            r#"
            INSERT INTO trainers (
                id, name, specialty, bio, photo_url, experience_years,
                sort_order, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&request.name)
        .bind(&request.specialty)
        .bind(&request.bio)
        .bind(&request.photo_url)
        .bind(request.experience_years)
        .bind(sort_order)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created trainer".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Trainer>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, TrainerRow>(
            r#"
            SELECT id, name, specialty, bio, photo_url, experience_years,
                   sort_order, is_active, created_at, updated_at
            FROM trainers
            WHERE id = ?
            "#,
        )
        .bind(&id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_trainer(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Trainer>> {
        let query = if include_inactive {
            r#"
            SELECT id, name, specialty, bio, photo_url, experience_years,
                   sort_order, is_active, created_at, updated_at
            FROM trainers
            ORDER BY sort_order ASC, name ASC
            "#
        } else {
            r#"
            SELECT id, name, specialty, bio, photo_url, experience_years,
                   sort_order, is_active, created_at, updated_at
            FROM trainers
            WHERE is_active = 1
            ORDER BY sort_order ASC, name ASC
            "#
        };

        let rows = sqlx::query_as::<_, TrainerRow>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_trainer).collect()
    }

    async fn update(&self, id: Uuid, request: UpdateTrainerRequest) -> Result<Trainer> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Trainer not found".to_string()))?;

        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        let name = request.name.unwrap_or(existing.name);
        let specialty = request.specialty.unwrap_or(existing.specialty);
        let bio = request.bio.or(existing.bio);
        let photo_url = request.photo_url.or(existing.photo_url);
        let experience_years = request.experience_years.unwrap_or(existing.experience_years);
        let sort_order = request.sort_order.unwrap_or(existing.sort_order);
        let is_active = request.is_active.unwrap_or(existing.is_active);

        sqlx::query(
            r#"
            UPDATE trainers
            SET name = ?, specialty = ?, bio = ?, photo_url = ?,
                experience_years = ?, sort_order = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(&specialty)
        .bind(&bio)
        .bind(&photo_url)
        .bind(experience_years)
        .bind(sort_order)
        .bind(if is_active { 1i32 } else { 0i32 })
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated trainer".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        sqlx::query("DELETE FROM trainers WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn get_next_sort_order(&self) -> Result<i32> {
        let row: (Option<i32>,) = sqlx::query_as("SELECT MAX(sort_order) FROM trainers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.0.unwrap_or(0) + 1)
    }

    async fn reorder(&self, ids: &[Uuid]) -> Result<()> {
        for (index, id) in ids.iter().enumerate() {
            let id_str = id.to_string();
            sqlx::query("UPDATE trainers SET sort_order = ? WHERE id = ?")
                .bind(index as i32)
                .bind(&id_str)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}
