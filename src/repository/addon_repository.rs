use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Addon, CreateAddonRequest, UpdateAddonRequest, slugify},
    error::{AppError, Result},
};

#[derive(FromRow)]
struct AddonRow {
    id: String,
    name: String,
    slug: String,
    description: Option<String>,
    price: i64,
    duration_minutes: Option<i32>,
    sort_order: i32,
    is_active: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[async_trait]
pub trait AddonRepository: Send + Sync {
    async fn create(&self, request: CreateAddonRequest) -> Result<Addon>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Addon>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Addon>>;
    async fn list(&self, include_inactive: bool) -> Result<Vec<Addon>>;
    async fn update(&self, id: Uuid, request: UpdateAddonRequest) -> Result<Addon>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn count_usage(&self, id: Uuid) -> Result<i64>;
    async fn get_next_sort_order(&self) -> Result<i32>;
    async fn reorder(&self, ids: &[Uuid]) -> Result<()>;
}

pub struct SqliteAddonRepository {
    pool: SqlitePool,
}

impl SqliteAddonRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_addon(row: AddonRow) -> Result<Addon> {
        Ok(Addon {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            slug: row.slug,
            description: row.description,
            price: row.price,
            duration_minutes: row.duration_minutes,
            sort_order: row.sort_order,
            is_active: row.is_active != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl AddonRepository for SqliteAddonRepository {
    async fn create(&self, request: CreateAddonRequest) -> Result<Addon> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let slug = request.slug.unwrap_or_else(|| slugify(&request.name));
        let now = Utc::now().naive_utc();
        let sort_order = self.get_next_sort_order().await?;

        sqlx::query(
            r#"
            INSERT INTO addons (
                id, name, slug, description, price, duration_minutes,
                sort_order, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&request.name)
        .bind(&slug)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.duration_minutes)
        .bind(sort_order)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created addon".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Addon>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, AddonRow>(
            r#"
            SELECT id, name, slug, description, price, duration_minutes,
                   sort_order, is_active, created_at, updated_at
            FROM addons
            WHERE id = ?
            "#,
        )
        .bind(&id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_addon(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Addon>> {
        let row = sqlx::query_as::<_, AddonRow>(
            r#"
            SELECT id, name, slug, description, price, duration_minutes,
                   sort_order, is_active, created_at, updated_at
            FROM addons
            WHERE slug = ?
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_addon(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Addon>> {
        let query = if include_inactive {
            r#"
            SELECT id, name, slug, description, price, duration_minutes,
                   sort_order, is_active, created_at, updated_at
            FROM addons
            ORDER BY sort_order ASC, name ASC
            "#
        } else {
            r#"
            SELECT id, name, slug, description, price, duration_minutes,
                   sort_order, is_active, created_at, updated_at
            FROM addons
            WHERE is_active = 1
            ORDER BY sort_order ASC, name ASC
            "#
        };

        let rows = sqlx::query_as::<_, AddonRow>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_addon).collect()
    }

    async fn update(&self, id: Uuid, request: UpdateAddonRequest) -> Result<Addon> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Addon not found".to_string()))?;

        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        let name = request.name.unwrap_or(existing.name);
        let description = request.description.or(existing.description);
        let price = request.price.unwrap_or(existing.price);
        let duration_minutes = request.duration_minutes.or(existing.duration_minutes);
        let sort_order = request.sort_order.unwrap_or(existing.sort_order);
        let is_active = request.is_active.unwrap_or(existing.is_active);

        sqlx::query(
            r#"
            UPDATE addons
            SET name = ?, description = ?, price = ?, duration_minutes = ?,
                sort_order = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(&description)
        .bind(price)
        .bind(duration_minutes)
        .bind(sort_order)
        .bind(if is_active { 1i32 } else { 0i32 })
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated addon".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        sqlx::query("DELETE FROM addons WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn count_usage(&self, id: Uuid) -> Result<i64> {
        let id_str = id.to_string();

        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) as count
            FROM bookings
            WHERE addon_id = ?
            "#,
        )
        .bind(&id_str)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.0)
    }

    async fn get_next_sort_order(&self) -> Result<i32> {
        let row: (Option<i32>,) = sqlx::query_as("SELECT MAX(sort_order) FROM addons")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.0.unwrap_or(0) + 1)
    }

    async fn reorder(&self, ids: &[Uuid]) -> Result<()> {
        for (index, id) in ids.iter().enumerate() {
            let id_str = id.to_string();
            sqlx::query("UPDATE addons SET sort_order = ? WHERE id = ?")
                .bind(index as i32)
                .bind(&id_str)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}
