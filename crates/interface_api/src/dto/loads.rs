//! Load DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{LoadId, StorageReference};
use domain_loads::{LengthUnit, Load, LoadFields, LoadListQuery, WeightUnit};
use domain_receipts::{CascadeReport, StorageWarning};

/// Body of `POST /loads` and `PUT /loads/:id`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRequest {
    pub current_location: String,
    pub destination_location: String,
    pub weight: Decimal,
    pub weight_unit: WeightUnit,
    pub truck_length: Decimal,
    pub length_unit: LengthUnit,
    pub contact_number: String,
    pub staff_contact_number: String,
}

impl From<LoadRequest> for LoadFields {
    fn from(req: LoadRequest) -> Self {
        LoadFields {
            current_location: req.current_location,
            destination_location: req.destination_location,
            weight: req.weight,
            weight_unit: req.weight_unit,
            truck_length: req.truck_length,
            length_unit: req.length_unit,
            contact_number: req.contact_number,
            staff_contact_number: req.staff_contact_number,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResponse {
    pub id: LoadId,
    pub current_location: String,
    pub destination_location: String,
    pub weight: Decimal,
    pub weight_unit: WeightUnit,
    pub truck_length: Decimal,
    pub length_unit: LengthUnit,
    pub contact_number: String,
    pub staff_contact_number: String,
    pub created_at: DateTime<Utc>,
    pub receipt_storage_id: Option<StorageReference>,
}

impl From<Load> for LoadResponse {
    fn from(load: Load) -> Self {
        let f = load.fields;
        Self {
            id: load.id,
            current_location: f.current_location,
            destination_location: f.destination_location,
            weight: f.weight,
            weight_unit: f.weight_unit,
            truck_length: f.truck_length,
            length_unit: f.length_unit,
            contact_number: f.contact_number,
            staff_contact_number: f.staff_contact_number,
            created_at: load.created_at,
            receipt_storage_id: load.receipt_storage_id,
        }
    }
}

/// Query string of `GET /loads`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLoadsParams {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub location: Option<String>,
}

impl From<ListLoadsParams> for LoadListQuery {
    fn from(params: ListLoadsParams) -> Self {
        LoadListQuery {
            date_from: params.date_from,
            date_to: params.date_to,
            location: params.location,
        }
    }
}

/// Body of `POST /loads/:id/receipt`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachReceiptRequest {
    /// Any accepted raw form: canonical, compact hex, or an upload URL
    pub storage_reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteLoadResponse {
    pub success: bool,
    pub blob_delete_attempted: bool,
    pub warnings: Vec<StorageWarning>,
}

impl From<CascadeReport> for DeleteLoadResponse {
    fn from(report: CascadeReport) -> Self {
        Self {
            success: true,
            blob_delete_attempted: report.blob_delete_attempted,
            warnings: report.warnings,
        }
    }
}
