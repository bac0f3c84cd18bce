//! PostgreSQL load store adapter

use std::time::Instant;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use core_kernel::{
    DomainPort, Filter, HealthCheckResult, HealthCheckable, LoadId, PortError, StorageReference,
};
use domain_loads::{Load, LoadField, LoadFields, LoadPatch, LoadStorePort, NewLoad};

use crate::error::DatabaseError;
use crate::repositories::loads::{LoadRepository, LoadRow};

const ADAPTER_ID: &str = "postgres-load-store";

/// PostgreSQL-backed implementation of [`LoadStorePort`]
#[derive(Debug, Clone)]
pub struct PostgresLoadStore {
    repository: LoadRepository,
    pool: PgPool,
}

impl PostgresLoadStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: LoadRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &LoadRepository {
        &self.repository
    }
}

impl DomainPort for PostgresLoadStore {}

#[async_trait]
impl HealthCheckable for PostgresLoadStore {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, ADAPTER_ID).await
    }
}

/// Runs `SELECT 1` and times it
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();
    let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(_) => HealthCheckResult::healthy(adapter_id, latency_ms),
        Err(e) => HealthCheckResult::unhealthy(adapter_id, latency_ms, format!("Database error: {}", e)),
    }
}

#[async_trait]
impl LoadStorePort for PostgresLoadStore {
    #[instrument(skip(self, load))]
    async fn insert_load(&self, load: NewLoad) -> Result<Load, PortError> {
        let id = LoadId::new();
        let row = self
            .repository
            .insert(*id.as_uuid(), &load.fields, load.created_at)
            .await?;
        debug!(load_id = %id, "load inserted");
        Ok(row_to_load(row)?)
    }

    #[instrument(skip(self), fields(load_id = %id))]
    async fn get_load(&self, id: LoadId) -> Result<Load, PortError> {
        let row = self.repository.get(*id.as_uuid()).await?;
        Ok(row_to_load(row)?)
    }

    #[instrument(skip(self, patch), fields(load_id = %id))]
    async fn patch_load(&self, id: LoadId, patch: LoadPatch) -> Result<Load, PortError> {
        let row = self.repository.patch(*id.as_uuid(), &patch).await?;
        Ok(row_to_load(row)?)
    }

    #[instrument(skip(self), fields(load_id = %id))]
    async fn delete_load(&self, id: LoadId) -> Result<(), PortError> {
        Ok(self.repository.delete(*id.as_uuid()).await?)
    }

    #[instrument(skip(self, filter))]
    async fn find_loads(&self, filter: Filter<LoadField>) -> Result<Vec<Load>, PortError> {
        let rows = self.repository.find(&filter).await?;
        debug!(count = rows.len(), "loads found");
        rows.into_iter()
            .map(|row| row_to_load(row).map_err(PortError::from))
            .collect()
    }
}

/// Maps a row to a [`Load`]
///
/// A stored receipt reference that no longer parses is dropped with a
/// warning rather than failing the read, so one bad row cannot hide a load.
fn row_to_load(row: LoadRow) -> Result<Load, DatabaseError> {
    let weight_unit = row
        .weight_unit
        .parse()
        .map_err(|_| DatabaseError::corrupt("loads", format!("unknown weight unit '{}'", row.weight_unit)))?;
    let length_unit = row
        .length_unit
        .parse()
        .map_err(|_| DatabaseError::corrupt("loads", format!("unknown length unit '{}'", row.length_unit)))?;

    let receipt_storage_id = row.receipt_storage_id.as_deref().and_then(|raw| {
        StorageReference::parse(raw)
            .map_err(|e| warn!(load_id = %row.load_id, error = %e, "ignoring unparseable receipt reference"))
            .ok()
    });

    Ok(Load {
        id: LoadId::from(row.load_id),
        fields: LoadFields {
            current_location: row.current_location,
            destination_location: row.destination_location,
            weight: row.weight,
            weight_unit,
            truck_length: row.truck_length,
            length_unit,
            contact_number: row.contact_number,
            staff_contact_number: row.staff_contact_number,
        },
        created_at: row.created_at,
        receipt_storage_id,
    })
}
