use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{PaymentRecord, PaymentStatus, PlanDuration},
    error::{AppError, Result},
    repository::PaymentRepository,
};

#[derive(FromRow)]
struct PaymentRow {
    id: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    membership_name: String,
    duration: String,
    original_price: i64,
    discount_amount: i64,
    final_amount: i64,
    coupon_code: Option<String>,
    transaction_note: String,
    status: String,
    receipt_no: Option<String>,
    payment_date: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_payment(row: PaymentRow) -> Result<PaymentRecord> {
        Ok(PaymentRecord {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            membership_name: row.membership_name,
            duration: PlanDuration::from_str(&row.duration)
                .ok_or_else(|| AppError::Database(format!("Invalid plan duration: {}", row.duration)))?,
            original_price: row.original_price,
            discount_amount: row.discount_amount,
            final_amount: row.final_amount,
            coupon_code: row.coupon_code,
            transaction_note: row.transaction_note,
            status: PaymentStatus::from_str(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid payment status: {}", row.status)))?,
            receipt_no: row.receipt_no,
            payment_date: row
                .payment_date
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn create(&self, payment: PaymentRecord) -> Result<PaymentRecord> {
        let id_str = payment.id.to_string();
        let status_str = payment.status.as_str();
        let payment_date_naive = payment.payment_date.map(|dt| dt.naive_utc());
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, customer_name, customer_email, customer_phone,
                membership_name, duration, original_price, discount_amount,
                final_amount, coupon_code, transaction_note, status,
                receipt_no, payment_date, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&payment.customer_name)
        .bind(&payment.customer_email)
        .bind(&payment.customer_phone)
        .bind(&payment.membership_name)
        .bind(payment.duration.as_str())
        .bind(payment.original_price)
        .bind(payment.discount_amount)
        .bind(payment.final_amount)
        .bind(&payment.coupon_code)
        .bind(&payment.transaction_note)
        .bind(status_str)
        .bind(&payment.receipt_no)
        .bind(payment_date_naive)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(payment.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created payment".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentRecord>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, customer_name, customer_email, customer_phone,
                   membership_name, duration, original_price, discount_amount,
                   final_amount, coupon_code, transaction_note, status,
                   receipt_no, payment_date, created_at, updated_at
            FROM payments
            WHERE id = ?
            "#,
        )
        .bind(&id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_payment(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_receipt_no(&self, receipt_no: &str) -> Result<Option<PaymentRecord>> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, customer_name, customer_email, customer_phone,
                   membership_name, duration, original_price, discount_amount,
                   final_amount, coupon_code, transaction_note, status,
                   receipt_no, payment_date, created_at, updated_at
            FROM payments
            WHERE receipt_no = ?
            "#,
        )
        .bind(receipt_no)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_payment(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<PaymentRecord>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, customer_name, customer_email, customer_phone,
                   membership_name, duration, original_price, discount_amount,
                   final_amount, coupon_code, transaction_note, status,
                   receipt_no, payment_date, created_at, updated_at
            FROM payments
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }

    async fn list_by_status(&self, status: PaymentStatus) -> Result<Vec<PaymentRecord>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, customer_name, customer_email, customer_phone,
                   membership_name, duration, original_price, discount_amount,
                   final_amount, coupon_code, transaction_note, status,
                   receipt_no, payment_date, created_at, updated_at
            FROM payments
            WHERE status = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }

    async fn verify(&self, id: Uuid, receipt_no: &str) -> Result<PaymentRecord> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        // COALESCE keeps the first receipt number and payment date if the
        // row was somehow verified twice.
        sqlx::query(
            r#"
            UPDATE payments
            SET status = ?,
                receipt_no = COALESCE(receipt_no, ?),
                payment_date = COALESCE(payment_date, ?),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(PaymentStatus::Verified.as_str())
        .bind(receipt_no)
        .bind(now)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve verified payment".to_string()))
    }

    async fn update_status(&self, id: Uuid, status: PaymentStatus) -> Result<PaymentRecord> {
        let id_str = id.to_string();
        let status_str = status.as_str();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE payments
            SET status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status_str)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated payment".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
