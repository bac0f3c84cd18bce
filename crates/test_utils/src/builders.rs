//! Test Data Builders
//!
//! Builders with valid defaults, so tests only spell out the fields they
//! care about.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use core_kernel::{LoadId, StorageReference};
use domain_loads::{LengthUnit, Load, LoadFields, WeightUnit};

/// Builder for [`LoadFields`]
#[derive(Debug, Clone)]
pub struct LoadFieldsBuilder {
    fields: LoadFields,
}

impl Default for LoadFieldsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadFieldsBuilder {
    /// Pune to Mumbai, 12.5 ton on a 32 ft truck
    pub fn new() -> Self {
        Self {
            fields: LoadFields {
                current_location: "Pune".to_string(),
                destination_location: "Mumbai".to_string(),
                weight: dec!(12.5),
                weight_unit: WeightUnit::Ton,
                truck_length: dec!(32),
                length_unit: LengthUnit::Ft,
                contact_number: "+91 98765 43210".to_string(),
                staff_contact_number: "+91 91234 56789".to_string(),
            },
        }
    }

    /// Starts from existing fields, e.g. ones from `fake_load_fields`
    pub fn from_fields(fields: LoadFields) -> Self {
        Self { fields }
    }

    pub fn from_location(mut self, location: impl Into<String>) -> Self {
        self.fields.current_location = location.into();
        self
    }

    pub fn to_location(mut self, location: impl Into<String>) -> Self {
        self.fields.destination_location = location.into();
        self
    }

    pub fn weight(mut self, weight: Decimal, unit: WeightUnit) -> Self {
        self.fields.weight = weight;
        self.fields.weight_unit = unit;
        self
    }

    pub fn truck_length(mut self, length: Decimal, unit: LengthUnit) -> Self {
        self.fields.truck_length = length;
        self.fields.length_unit = unit;
        self
    }

    pub fn contact_number(mut self, number: impl Into<String>) -> Self {
        self.fields.contact_number = number.into();
        self
    }

    pub fn staff_contact_number(mut self, number: impl Into<String>) -> Self {
        self.fields.staff_contact_number = number.into();
        self
    }

    pub fn build(self) -> LoadFields {
        self.fields
    }

    /// The same fields as a camelCase `POST /loads` body
    pub fn build_json(self) -> Value {
        let f = self.fields;
        json!({
            "currentLocation": f.current_location,
            "destinationLocation": f.destination_location,
            "weight": f.weight.to_string(),
            "weightUnit": f.weight_unit.as_str(),
            "truckLength": f.truck_length.to_string(),
            "lengthUnit": f.length_unit.as_str(),
            "contactNumber": f.contact_number,
            "staffContactNumber": f.staff_contact_number,
        })
    }
}

/// Builder for stored [`Load`] records, for seeding mock stores
#[derive(Debug, Clone)]
pub struct LoadBuilder {
    id: LoadId,
    fields: LoadFields,
    created_at: DateTime<Utc>,
    receipt: Option<StorageReference>,
}

impl Default for LoadBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadBuilder {
    pub fn new() -> Self {
        Self {
            id: LoadId::new(),
            fields: LoadFieldsBuilder::new().build(),
            created_at: Utc::now(),
            receipt: None,
        }
    }

    pub fn with_id(mut self, id: LoadId) -> Self {
        self.id = id;
        self
    }

    pub fn with_fields(mut self, fields: LoadFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn with_receipt(mut self, reference: StorageReference) -> Self {
        self.receipt = Some(reference);
        self
    }

    pub fn build(self) -> Load {
        Load {
            id: self.id,
            fields: self.fields,
            created_at: self.created_at,
            receipt_storage_id: self.receipt,
        }
    }
}
