use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Coupon, CreateCouponRequest, UpdateCouponRequest},
    error::{AppError, Result},
};

#[derive(FromRow)]
struct CouponRow {
    id: String,
    code: String,
    discount: i64,
    is_active: i32,
    valid_until: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[async_trait]
pub trait CouponRepository: Send + Sync {
    async fn create(&self, request: CreateCouponRequest) -> Result<Coupon>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Coupon>>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>>;
    async fn list(&self) -> Result<Vec<Coupon>>;
    async fn update(&self, id: Uuid, request: UpdateCouponRequest) -> Result<Coupon>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

pub struct SqliteCouponRepository {
    pool: SqlitePool,
}

impl SqliteCouponRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_coupon(row: CouponRow) -> Result<Coupon> {
        Ok(Coupon {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            code: row.code,
            discount: row.discount,
            is_active: row.is_active != 0,
            valid_until: row
                .valid_until
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl CouponRepository for SqliteCouponRepository {
    async fn create(&self, request: CreateCouponRequest) -> Result<Coupon> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let code = request.code.trim().to_uppercase();
        let valid_until_naive = request.valid_until.map(|dt| dt.naive_utc());
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO coupons (
                id, code, discount, is_active, valid_until, created_at, updated_at
            ) VALUES (?, ?, ?, 1, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&code)
        .bind(request.discount)
        .bind(valid_until_naive)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created coupon".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Coupon>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, CouponRow>(
            r#"
            SELECT id, code, discount, is_active, valid_until, created_at, updated_at
            FROM coupons
            WHERE id = ?
            "#,
        )
        .bind(&id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_coupon(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>> {
        let code = code.trim().to_uppercase();
        let row = sqlx::query_as::<_, CouponRow>(
            r#"
            SELECT id, code, discount, is_active, valid_until, created_at, updated_at
            FROM coupons
            WHERE code = ?
            "#,
        )
        .bind(&code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_coupon(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Coupon>> {
        let rows = sqlx::query_as::<_, CouponRow>(
            r#"
            SELECT id, code, discount, is_active, valid_until, created_at, updated_at
            FROM coupons
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_coupon).collect()
    }

    async fn update(&self, id: Uuid, request: UpdateCouponRequest) -> Result<Coupon> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Coupon not found".to_string()))?;

        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        let discount = request.discount.unwrap_or(existing.discount);
        let is_active = request.is_active.unwrap_or(existing.is_active);
        let valid_until = request.valid_until.or(existing.valid_until);
        let valid_until_naive = valid_until.map(|dt| dt.naive_utc());

        sqlx::query(
            r#"
            UPDATE coupons
            SET discount = ?, is_active = ?, valid_until = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(discount)
        .bind(if is_active { 1i32 } else { 0i32 })
        .bind(valid_until_naive)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated coupon".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        sqlx::query("DELETE FROM coupons WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
