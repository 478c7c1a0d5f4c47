use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use wayfare_core::payment::{PaymentRecord, PaymentRecordStatus};
use wayfare_core::repository::PaymentRecordRepository;

pub struct StorePaymentRecordRepository {
    pool: PgPool,
}

impl StorePaymentRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRecordRow {
    id: Uuid,
    order_id: String,
    user_id: Uuid,
    package_id: Uuid,
    verified_price: Option<f64>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRecordRow> for PaymentRecord {
    type Error = wayfare_core::CoreError;

    fn try_from(row: PaymentRecordRow) -> Result<Self, Self::Error> {
        Ok(PaymentRecord {
            id: row.id,
            order_id: row.order_id,
            user_id: row.user_id,
            package_id: row.package_id,
            verified_price: row.verified_price,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl PaymentRecordRepository for StorePaymentRecordRepository {
    async fn create_record(
        &self,
        record: &PaymentRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO payment_records (id, order_id, user_id, package_id, verified_price, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id)
        .bind(&record.order_id)
        .bind(record.user_id)
        .bind(record.package_id)
        .bind(record.verified_price)
        .bind(record.status.as_str())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<PaymentRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, PaymentRecordRow>(
            r#"
            SELECT id, order_id, user_id, package_id, verified_price, status, created_at, updated_at
            FROM payment_records
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(PaymentRecord::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn update_status(
        &self,
        order_id: &str,
        from: &[PaymentRecordStatus],
        status: PaymentRecordStatus,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let from: Vec<&str> = from.iter().map(|s| s.as_str()).collect();

        let result = sqlx::query(
            r#"
            UPDATE payment_records SET status = $1, updated_at = NOW()
            WHERE order_id = $2 AND status = ANY($3)
            "#,
        )
        .bind(status.as_str())
        .bind(order_id)
        .bind(&from)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
