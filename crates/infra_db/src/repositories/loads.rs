//! Load repository
//!
//! SQL for the `loads` table. Queries are built at runtime with
//! `sqlx::query_as` and `QueryBuilder`, so the crate builds without a
//! live database.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use core_kernel::Filter;
use domain_loads::{LoadField, LoadFields, LoadPatch};

use crate::error::DatabaseError;
use crate::filter_sql::push_filter;

const LOAD_COLUMNS: &str = "load_id, current_location, destination_location, weight, weight_unit, \
     truck_length, length_unit, contact_number, staff_contact_number, created_at, receipt_storage_id";

/// A row of the `loads` table
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct LoadRow {
    pub load_id: Uuid,
    pub current_location: String,
    pub destination_location: String,
    pub weight: Decimal,
    pub weight_unit: String,
    pub truck_length: Decimal,
    pub length_unit: String,
    pub contact_number: String,
    pub staff_contact_number: String,
    pub created_at: DateTime<Utc>,
    pub receipt_storage_id: Option<String>,
}

/// Repository for the `loads` table
#[derive(Debug, Clone)]
pub struct LoadRepository {
    pool: PgPool,
}

impl LoadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        load_id: Uuid,
        fields: &LoadFields,
        created_at: DateTime<Utc>,
    ) -> Result<LoadRow, DatabaseError> {
        let sql = format!(
            "INSERT INTO loads ({LOAD_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NULL) \
             RETURNING {LOAD_COLUMNS}"
        );
        let row = sqlx::query_as::<_, LoadRow>(&sql)
            .bind(load_id)
            .bind(&fields.current_location)
            .bind(&fields.destination_location)
            .bind(fields.weight)
            .bind(fields.weight_unit.as_str())
            .bind(fields.truck_length)
            .bind(fields.length_unit.as_str())
            .bind(&fields.contact_number)
            .bind(&fields.staff_contact_number)
            .bind(created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn get(&self, load_id: Uuid) -> Result<LoadRow, DatabaseError> {
        let sql = format!("SELECT {LOAD_COLUMNS} FROM loads WHERE load_id = $1");
        sqlx::query_as::<_, LoadRow>(&sql)
            .bind(load_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Load", load_id))
    }

    /// Applies the set parts of `patch` in a single UPDATE
    pub async fn patch(&self, load_id: Uuid, patch: &LoadPatch) -> Result<LoadRow, DatabaseError> {
        if patch.is_empty() {
            return self.get(load_id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE loads SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(fields) = &patch.fields {
                set.push("current_location = ").push_bind_unseparated(fields.current_location.clone());
                set.push("destination_location = ").push_bind_unseparated(fields.destination_location.clone());
                set.push("weight = ").push_bind_unseparated(fields.weight);
                set.push("weight_unit = ").push_bind_unseparated(fields.weight_unit.as_str());
                set.push("truck_length = ").push_bind_unseparated(fields.truck_length);
                set.push("length_unit = ").push_bind_unseparated(fields.length_unit.as_str());
                set.push("contact_number = ").push_bind_unseparated(fields.contact_number.clone());
                set.push("staff_contact_number = ")
                    .push_bind_unseparated(fields.staff_contact_number.clone());
            }
            if let Some(receipt) = &patch.receipt_storage_id {
                set.push("receipt_storage_id = ")
                    .push_bind_unseparated(receipt.as_ref().map(|r| r.as_str().to_string()));
            }
        }
        qb.push(" WHERE load_id = ").push_bind(load_id);
        qb.push(" RETURNING ").push(LOAD_COLUMNS);

        qb.build_query_as::<LoadRow>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Load", load_id))
    }

    pub async fn delete(&self, load_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM loads WHERE load_id = $1")
            .bind(load_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Load", load_id));
        }
        Ok(())
    }

    /// Returns matching rows, oldest first
    pub async fn find(&self, filter: &Filter<LoadField>) -> Result<Vec<LoadRow>, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(LOAD_COLUMNS).push(" FROM loads WHERE ");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at, load_id");

        Ok(qb.build_query_as::<LoadRow>().fetch_all(&self.pool).await?)
    }
}
