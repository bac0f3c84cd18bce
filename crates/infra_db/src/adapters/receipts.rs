//! PostgreSQL receipt ledger adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use core_kernel::{
    DomainPort, Filter, HealthCheckResult, HealthCheckable, PortError, ReceiptId, StorageReference,
};
use domain_receipts::{NewStandaloneReceipt, ReceiptField, ReceiptLedgerPort, StandaloneReceipt};

use crate::adapters::loads::ping;
use crate::error::DatabaseError;
use crate::repositories::receipts::{ReceiptRepository, ReceiptRow};

/// PostgreSQL-backed implementation of [`ReceiptLedgerPort`]
#[derive(Debug, Clone)]
pub struct PostgresReceiptLedger {
    repository: ReceiptRepository,
    pool: PgPool,
}

impl PostgresReceiptLedger {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReceiptRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresReceiptLedger {}

#[async_trait]
impl HealthCheckable for PostgresReceiptLedger {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-receipt-ledger").await
    }
}

#[async_trait]
impl ReceiptLedgerPort for PostgresReceiptLedger {
    #[instrument(skip(self, receipt))]
    async fn insert_receipt(&self, receipt: NewStandaloneReceipt) -> Result<StandaloneReceipt, PortError> {
        let id = ReceiptId::new();
        let row = self
            .repository
            .insert(*id.as_uuid(), receipt.storage_reference.as_str(), receipt.created_at)
            .await?;
        Ok(row_to_receipt(row)?)
    }

    #[instrument(skip(self), fields(receipt_id = %id))]
    async fn get_receipt(&self, id: ReceiptId) -> Result<StandaloneReceipt, PortError> {
        let row = self.repository.get(*id.as_uuid()).await?;
        Ok(row_to_receipt(row)?)
    }

    /// Rows whose reference no longer parses are skipped with a warning
    #[instrument(skip(self, filter))]
    async fn find_receipts(&self, filter: Filter<ReceiptField>) -> Result<Vec<StandaloneReceipt>, PortError> {
        let rows = self.repository.find(&filter).await?;
        let total = rows.len();
        let receipts: Vec<_> = rows
            .into_iter()
            .filter_map(|row| {
                row_to_receipt(row)
                    .map_err(|e| warn!(error = %e, "skipping receipt row"))
                    .ok()
            })
            .collect();
        debug!(total, kept = receipts.len(), "receipts found");
        Ok(receipts)
    }

    #[instrument(skip(self), fields(receipt_id = %id))]
    async fn delete_receipt(&self, id: ReceiptId) -> Result<(), PortError> {
        Ok(self.repository.delete(*id.as_uuid()).await?)
    }
}

fn row_to_receipt(row: ReceiptRow) -> Result<StandaloneReceipt, DatabaseError> {
    let storage_reference = StorageReference::parse(&row.storage_reference)
        .map_err(|e| DatabaseError::corrupt("receipts", e.to_string()))?;
    Ok(StandaloneReceipt {
        id: ReceiptId::from(row.receipt_id),
        storage_reference,
        created_at: row.created_at,
    })
}
