use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{
        CreateMembershipPlanRequest, MembershipPlan, PlanDuration, UpdateMembershipPlanRequest,
        default_membership_plans, slugify,
    },
    error::{AppError, Result},
};

#[derive(FromRow)]
struct MembershipPlanRow {
    id: String,
    name: String,
    slug: String,
    description: Option<String>,
    duration: String,
    price: i64,
    perks: String,
    sort_order: i32,
    is_active: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[async_trait]
pub trait MembershipPlanRepository: Send + Sync {
    async fn create(&self, request: CreateMembershipPlanRequest) -> Result<MembershipPlan>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MembershipPlan>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<MembershipPlan>>;
    async fn list(&self, include_inactive: bool) -> Result<Vec<MembershipPlan>>;
    async fn update(&self, id: Uuid, request: UpdateMembershipPlanRequest) -> Result<MembershipPlan>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn get_next_sort_order(&self) -> Result<i32>;
    async fn reorder(&self, ids: &[Uuid]) -> Result<()>;
    async fn seed_defaults(&self) -> Result<Vec<MembershipPlan>>;
}

pub struct SqliteMembershipPlanRepository {
    pool: SqlitePool,
}

impl SqliteMembershipPlanRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_plan(row: MembershipPlanRow) -> Result<MembershipPlan> {
        Ok(MembershipPlan {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            slug: row.slug,
            description: row.description,
            duration: PlanDuration::from_str(&row.duration)
                .ok_or_else(|| AppError::Database(format!("Invalid plan duration: {}", row.duration)))?,
            price: row.price,
            perks: serde_json::from_str(&row.perks)
                .map_err(|e| AppError::Database(e.to_string()))?,
            sort_order: row.sort_order,
            is_active: row.is_active != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_duration(s: &str) -> Result<PlanDuration> {
        PlanDuration::from_str(s)
            .ok_or_else(|| AppError::Validation(format!("Invalid plan duration: {}", s)))
    }
}

#[async_trait]
impl MembershipPlanRepository for SqliteMembershipPlanRepository {
    async fn create(&self, request: CreateMembershipPlanRequest) -> Result<MembershipPlan> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let slug = request.slug.unwrap_or_else(|| slugify(&request.name));
        let duration = Self::parse_duration(&request.duration)?;
        let perks_json = serde_json::to_string(&request.perks)
            .map_err(|e| AppError::Database(e.to_string()))?;
        let now = Utc::now().naive_utc();
        let sort_order = self.get_next_sort_order().await?;

        sqlx::query(
            r#"
            INSERT INTO membership_plans (
                id, name, slug, description, duration, price,
                perks, sort_order, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&request.name)
        .bind(&slug)
        .bind(&request.description)
        .bind(duration.as_str())
        .bind(request.price)
        .bind(&perks_json)
        .bind(sort_order)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created plan".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MembershipPlan>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, MembershipPlanRow>(
            r#"
            SELECT id, name, slug, description, duration, price,
                   perks, sort_order, is_active, created_at, updated_at
            FROM membership_plans
            WHERE id = ?
            "#,
        )
        .bind(&id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_plan(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<MembershipPlan>> {
        let row = sqlx::query_as::<_, MembershipPlanRow>(
            r#"
            SELECT id, name, slug, description, duration, price,
                   perks, sort_order, is_active, created_at, updated_at
            FROM membership_plans
            WHERE slug = ?
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_plan(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<MembershipPlan>> {
        let query = if include_inactive {
            r#"
            SELECT id, name, slug, description, duration, price,
                   perks, sort_order, is_active, created_at, updated_at
            FROM membership_plans
            ORDER BY sort_order ASC, name ASC
            "#
        } else {
            r#"
            SELECT id, name, slug, description, duration, price,
                   perks, sort_order, is_active, created_at, updated_at
            FROM membership_plans
            WHERE is_active = 1
            ORDER BY sort_order ASC, name ASC
            "#
        };

        let rows = sqlx::query_as::<_, MembershipPlanRow>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_plan).collect()
    }

    async fn update(&self, id: Uuid, request: UpdateMembershipPlanRequest) -> Result<MembershipPlan> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership plan not found".to_string()))?;

        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        let name = request.name.unwrap_or(existing.name);
        let description = request.description.or(existing.description);
        let duration = match request.duration {
            Some(d) => Self::parse_duration(&d)?,
            None => existing.duration,
        };
        let price = request.price.unwrap_or(existing.price);
        let perks = request.perks.unwrap_or(existing.perks);
        let perks_json =
            serde_json::to_string(&perks).map_err(|e| AppError::Database(e.to_string()))?;
        let sort_order = request.sort_order.unwrap_or(existing.sort_order);
        let is_active = request.is_active.unwrap_or(existing.is_active);

        sqlx::query(
            r#"
            UPDATE membership_plans
            SET name = ?, description = ?, duration = ?, price = ?,
                perks = ?, sort_order = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(&description)
        .bind(duration.as_str())
        .bind(price)
        .bind(&perks_json)
        .bind(sort_order)
        .bind(if is_active { 1i32 } else { 0i32 })
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated plan".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        sqlx::query("DELETE FROM membership_plans WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn get_next_sort_order(&self) -> Result<i32> {
        let row: (Option<i32>,) = sqlx::query_as("SELECT MAX(sort_order) FROM membership_plans")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.0.unwrap_or(0) + 1)
    }

    async fn reorder(&self, ids: &[Uuid]) -> Result<()> {
        for (index, id) in ids.iter().enumerate() {
            let id_str = id.to_string();
            sqlx::query("UPDATE membership_plans SET sort_order = ? WHERE id = ?")
                .bind(index as i32)
                .bind(&id_str)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    async fn seed_defaults(&self) -> Result<Vec<MembershipPlan>> {
        let defaults = default_membership_plans();
        let mut created = Vec::new();

        for (index, (name, slug, duration, price, perks)) in defaults.into_iter().enumerate() {
            // Skip if already exists
            if self.find_by_slug(slug).await?.is_some() {
                continue;
            }

            let id = Uuid::new_v4();
            let id_str = id.to_string();
            let perks_json = serde_json::to_string(perks)
                .map_err(|e| AppError::Database(e.to_string()))?;
            let now = Utc::now().naive_utc();

            sqlx::query(
                r#"
                INSERT INTO membership_plans (
                    id, name, slug, description, duration, price,
                    perks, sort_order, is_active, created_at, updated_at
                ) VALUES (?, ?, ?, NULL, ?, ?, ?, ?, 1, ?, ?)
                "#,
            )
            .bind(&id_str)
            .bind(name)
            .bind(slug)
            .bind(duration.as_str())
            .bind(price)
            .bind(&perks_json)
            .bind(index as i32)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

            if let Some(plan) = self.find_by_id(id).await? {
                created.push(plan);
            }
        }

        Ok(created)
    }
}
