//! Load records
//!
//! [`LoadFields`] holds everything a dispatcher enters for a load and is the
//! unit of validation. [`Load`] adds the identity, the creation timestamp and
//! the optional receipt reference, which are managed by the system.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

use core_kernel::{FieldValue, Filterable, LoadId, StorageReference};

use crate::error::LoadError;

/// Unit for a load's weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Ton,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Ton => "ton",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightUnit {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(WeightUnit::Kg),
            "ton" => Ok(WeightUnit::Ton),
            other => Err(LoadError::invalid(format!("unknown weight unit '{}'", other))),
        }
    }
}

/// Unit for the required truck length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    M,
    Ft,
}

impl LengthUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthUnit::M => "m",
            LengthUnit::Ft => "ft",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LengthUnit {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(LengthUnit::M),
            "ft" => Ok(LengthUnit::Ft),
            other => Err(LoadError::invalid(format!("unknown length unit '{}'", other))),
        }
    }
}

/// Dispatcher-entered fields of a load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoadFields {
    #[validate(length(max = 200), custom(function = "not_blank"))]
    pub current_location: String,
    #[validate(length(max = 200), custom(function = "not_blank"))]
    pub destination_location: String,
    #[validate(custom(function = "positive"))]
    pub weight: Decimal,
    pub weight_unit: WeightUnit,
    #[validate(custom(function = "positive"))]
    pub truck_length: Decimal,
    pub length_unit: LengthUnit,
    #[validate(custom(function = "phone_number"))]
    pub contact_number: String,
    #[validate(custom(function = "phone_number"))]
    pub staff_contact_number: String,
}

impl LoadFields {
    /// Validates every field, collecting all failures
    ///
    /// # Errors
    ///
    /// `LoadError::Validation` with one `field: code` entry per failure,
    /// sorted for stable output.
    pub fn check(&self) -> Result<(), LoadError> {
        self.validate().map_err(validation_messages)
    }
}

fn validation_messages(errors: ValidationErrors) -> LoadError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(move |e| format!("{}: {}", field, e.code))
                .collect::<Vec<_>>()
        })
        .collect();
    messages.sort();
    LoadError::Validation(messages)
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("must_be_positive"));
    }
    Ok(())
}

fn phone_number(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
    let allowed = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    if !allowed || !(6..=20).contains(&trimmed.len()) || digits < 6 {
        let mut err = ValidationError::new("invalid_phone");
        err.message = Some(Cow::Borrowed("expected 6-20 characters of digits, '+', '-', spaces or parentheses"));
        return Err(err);
    }
    Ok(())
}

/// A stored load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    pub id: LoadId,
    pub fields: LoadFields,
    pub created_at: DateTime<Utc>,
    /// Canonical reference of the attached receipt blob, if any
    pub receipt_storage_id: Option<StorageReference>,
}

impl Load {
    pub fn has_receipt(&self) -> bool {
        self.receipt_storage_id.is_some()
    }

    /// Applies a patch in place, as a record store would
    pub fn apply(&mut self, patch: LoadPatch) {
        if let Some(fields) = patch.fields {
            self.fields = fields;
        }
        if let Some(receipt) = patch.receipt_storage_id {
            self.receipt_storage_id = receipt;
        }
    }
}

/// Named load fields usable in record-store filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadField {
    CurrentLocation,
    DestinationLocation,
    Weight,
    TruckLength,
    ContactNumber,
    CreatedAt,
    ReceiptStorageId,
}

impl Filterable<LoadField> for Load {
    fn field_value(&self, field: LoadField) -> FieldValue {
        match field {
            LoadField::CurrentLocation => self.fields.current_location.as_str().into(),
            LoadField::DestinationLocation => self.fields.destination_location.as_str().into(),
            LoadField::Weight => self.fields.weight.into(),
            LoadField::TruckLength => self.fields.truck_length.into(),
            LoadField::ContactNumber => self.fields.contact_number.as_str().into(),
            LoadField::CreatedAt => self.created_at.into(),
            LoadField::ReceiptStorageId => self.receipt_storage_id.as_ref().into(),
        }
    }
}

/// Insert payload; the record store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoad {
    pub fields: LoadFields,
    pub created_at: DateTime<Utc>,
}

/// Partial update of a stored load
///
/// `receipt_storage_id` is doubly optional: `None` leaves the field alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadPatch {
    pub fields: Option<LoadFields>,
    pub receipt_storage_id: Option<Option<StorageReference>>,
}

impl LoadPatch {
    pub fn fields(fields: LoadFields) -> Self {
        Self {
            fields: Some(fields),
            ..Default::default()
        }
    }

    pub fn set_receipt(reference: StorageReference) -> Self {
        Self {
            receipt_storage_id: Some(Some(reference)),
            ..Default::default()
        }
    }

    pub fn clear_receipt() -> Self {
        Self {
            receipt_storage_id: Some(None),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_none() && self.receipt_storage_id.is_none()
    }
}
