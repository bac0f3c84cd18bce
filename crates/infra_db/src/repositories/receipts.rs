//! Standalone receipt repository

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use core_kernel::Filter;
use domain_receipts::ReceiptField;

use crate::error::DatabaseError;
use crate::filter_sql::push_filter;

/// A row of the `receipts` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ReceiptRow {
    pub receipt_id: Uuid,
    pub storage_reference: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for the `receipts` table
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: PgPool,
}

impl ReceiptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        receipt_id: Uuid,
        storage_reference: &str,
        created_at: DateTime<Utc>,
    ) -> Result<ReceiptRow, DatabaseError> {
        let row = sqlx::query_as::<_, ReceiptRow>(
            r#"
            INSERT INTO receipts (receipt_id, storage_reference, created_at)
            VALUES ($1, $2, $3)
            RETURNING receipt_id, storage_reference, created_at
            "#,
        )
        .bind(receipt_id)
        .bind(storage_reference)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get(&self, receipt_id: Uuid) -> Result<ReceiptRow, DatabaseError> {
        sqlx::query_as::<_, ReceiptRow>(
            "SELECT receipt_id, storage_reference, created_at FROM receipts WHERE receipt_id = $1",
        )
        .bind(receipt_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Receipt", receipt_id))
    }

    pub async fn find(&self, filter: &Filter<ReceiptField>) -> Result<Vec<ReceiptRow>, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT receipt_id, storage_reference, created_at FROM receipts WHERE ",
        );
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at, receipt_id");

        Ok(qb.build_query_as::<ReceiptRow>().fetch_all(&self.pool).await?)
    }

    pub async fn delete(&self, receipt_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM receipts WHERE receipt_id = $1")
            .bind(receipt_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Receipt", receipt_id));
        }
        Ok(())
    }
}
