//! Load application service
//!
//! Plain create/update/read/list operations over [`LoadStorePort`]. Deleting a
//! load is deliberately absent: deletion has to cascade to the attached
//! receipt blob, so it lives on the receipt lifecycle coordinator.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, instrument};

use core_kernel::{Filter, LoadId, Timezone};

use crate::error::LoadError;
use crate::load::{Load, LoadField, LoadFields, LoadPatch, NewLoad};
use crate::ports::LoadStorePort;

/// Listing criteria for [`LoadService::list_loads`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadListQuery {
    /// Inclusive first calendar day; only applied together with `date_to`
    pub date_from: Option<NaiveDate>,
    /// Inclusive last calendar day; only applied together with `date_from`
    pub date_to: Option<NaiveDate>,
    /// Matches either the current or the destination location
    pub location: Option<String>,
}

impl LoadListQuery {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            date_from: Some(from),
            date_to: Some(to),
            ..Default::default()
        }
    }

    pub fn at_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Service for load records
#[derive(Clone)]
pub struct LoadService {
    store: Arc<dyn LoadStorePort>,
    timezone: Timezone,
}

impl LoadService {
    /// Creates a service whose calendar days are in `timezone`
    pub fn new(store: Arc<dyn LoadStorePort>, timezone: Timezone) -> Self {
        Self { store, timezone }
    }

    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Validates and stores a new load stamped with the current time
    #[instrument(skip(self, fields))]
    pub async fn create_load(&self, fields: LoadFields) -> Result<Load, LoadError> {
        fields.check()?;
        let load = self
            .store
            .insert_load(NewLoad {
                fields,
                created_at: Utc::now(),
            })
            .await?;
        debug!(load_id = %load.id, "load created");
        Ok(load)
    }

    /// Replaces the descriptive fields of an existing load
    ///
    /// The receipt reference and creation time are left untouched.
    #[instrument(skip(self, fields), fields(load_id = %id))]
    pub async fn update_load(&self, id: LoadId, fields: LoadFields) -> Result<Load, LoadError> {
        fields.check()?;
        self.store
            .get_load(id)
            .await
            .map_err(|e| LoadError::from_port(id, e))?;
        self.store
            .patch_load(id, LoadPatch::fields(fields))
            .await
            .map_err(|e| LoadError::from_port(id, e))
    }

    pub async fn get_load(&self, id: LoadId) -> Result<Load, LoadError> {
        self.store
            .get_load(id)
            .await
            .map_err(|e| LoadError::from_port(id, e))
    }

    /// Loads created on today's calendar day in the business timezone
    pub async fn list_today(&self) -> Result<Vec<Load>, LoadError> {
        self.list_on(self.timezone.today()).await
    }

    /// Loads created on `date` in the business timezone
    pub async fn list_on(&self, date: NaiveDate) -> Result<Vec<Load>, LoadError> {
        let (start, end) = self.timezone.day_window(date);
        Ok(self.store.find_loads(created_within(start, end)).await?)
    }

    /// Lists loads by optional date range and location
    ///
    /// # Errors
    ///
    /// `LoadError::Validation` when `date_from` is after `date_to`.
    #[instrument(skip(self))]
    pub async fn list_loads(&self, query: LoadListQuery) -> Result<Vec<Load>, LoadError> {
        let mut filter = Filter::All;

        if let (Some(from), Some(to)) = (query.date_from, query.date_to) {
            if from > to {
                return Err(LoadError::invalid(format!(
                    "date_from {} is after date_to {}",
                    from, to
                )));
            }
            let (start, end) = self.timezone.date_range_window(from, to);
            filter = filter.and(created_within(start, end));
        }

        if let Some(location) = query.location.as_deref().filter(|l| !l.trim().is_empty()) {
            filter = filter.and(
                Filter::eq(LoadField::CurrentLocation, location)
                    .or(Filter::eq(LoadField::DestinationLocation, location)),
            );
        }

        Ok(self.store.find_loads(filter).await?)
    }

    /// Loads carrying a receipt that were created at or after `since`
    pub async fn new_receipts_since(&self, since: DateTime<Utc>) -> Result<Vec<Load>, LoadError> {
        let filter = Filter::is_set(LoadField::ReceiptStorageId)
            .and(Filter::gte(LoadField::CreatedAt, since));
        Ok(self.store.find_loads(filter).await?)
    }
}

/// `start <= created_at < end`, expressed with the inclusive operators
fn created_within(start: DateTime<Utc>, end: DateTime<Utc>) -> Filter<LoadField> {
    Filter::gte(LoadField::CreatedAt, start)
        .and(Filter::lte(LoadField::CreatedAt, end - Duration::microseconds(1)))
}
